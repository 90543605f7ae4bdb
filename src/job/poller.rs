use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use super::status::{JobStatus, failure_message, raw_status};
use crate::azure::client::STATUS_TIMEOUT;
use crate::azure::{AzureClient, Route};
use crate::error::MediaError;

/// Suspension between status queries.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl PollSettings {
    pub fn from_secs(interval: u64, max_wait: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval),
            max_wait: Duration::from_secs(max_wait),
        }
    }
}

/// Something observed on a non-terminal tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent<'a> {
    /// The job reported a non-terminal status.
    Pending { status: &'a str, elapsed: Duration },
    /// The status query itself failed; polling continues.
    Transient { reason: String, elapsed: Duration },
}

/// Polls a status URL at a fixed interval until the job reaches a terminal
/// state or the accumulated sleep time reaches `max_wait`.
pub struct StatusPoller<'a, S> {
    client: &'a AzureClient,
    sleeper: &'a S,
    settings: PollSettings,
}

impl<'a, S: Sleeper> StatusPoller<'a, S> {
    pub fn new(client: &'a AzureClient, sleeper: &'a S, settings: PollSettings) -> Self {
        Self {
            client,
            sleeper,
            settings,
        }
    }

    /// Returns the terminal success payload.
    pub async fn poll(
        &self,
        url: &str,
        route: Route,
        mut on_event: impl FnMut(PollEvent<'_>),
    ) -> Result<Value, MediaError> {
        let mut elapsed = Duration::ZERO;

        while elapsed < self.settings.max_wait {
            match self.fetch(url, route).await {
                Ok(payload) => {
                    let status = raw_status(&payload);
                    match JobStatus::normalize(status) {
                        JobStatus::Succeeded => {
                            debug!(%url, status, ?elapsed, "job succeeded");
                            return Ok(payload);
                        }
                        JobStatus::Failed => {
                            return Err(MediaError::JobFailed {
                                message: failure_message(&payload),
                            });
                        }
                        JobStatus::InProgress => {
                            debug!(status, ?elapsed, "job still running");
                            on_event(PollEvent::Pending { status, elapsed });
                        }
                    }
                }
                Err(reason) => {
                    warn!(%url, reason = reason.as_str(), "status query failed, retrying");
                    on_event(PollEvent::Transient { reason, elapsed });
                }
            }

            self.sleeper.sleep(self.settings.interval).await;
            elapsed += self.settings.interval;
        }

        Err(MediaError::Timeout {
            waited_secs: self.settings.max_wait.as_secs(),
        })
    }

    // Err carries a human-readable reason for a transient failure.
    async fn fetch(&self, url: &str, route: Route) -> Result<Value, String> {
        let resp = self
            .client
            .get(url, Some(route), STATUS_TIMEOUT)
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| format!("unreadable status body: {e}"))
    }
}
