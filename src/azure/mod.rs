pub mod client;
pub mod routes;
pub mod types;

pub use client::AzureClient;
pub use routes::{Endpoint, Route, RouteMode};
