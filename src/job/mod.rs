mod poller;
mod schema;
mod status;

pub use poller::{PollEvent, PollSettings, Sleeper, StatusPoller, TokioSleeper};
pub use schema::{ResponseSchema, id_string};

#[cfg(test)]
pub(crate) use poller::testing;
