//! URL shapes for the Azure OpenAI media endpoints.
//!
//! The video capability has shipped under several incompatible REST shapes.
//! [`Route`] names a concrete shape and [`RouteMode`] is the user-facing
//! selection, where `auto` expands to an ordered candidate list.

use std::fmt;
use std::str::FromStr;

use crate::error::MediaError;

/// Base coordinates shared by every URL: resource endpoint, deployment and API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    deployment: String,
    api_version: String,
}

impl Endpoint {
    pub fn new(base: &str, deployment: &str, api_version: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            api_version: api_version.to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn image_generation_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/images/generations?api-version={}",
            self.base, self.deployment, self.api_version
        )
    }
}

/// A concrete video route shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/openai/v1/video/generations/jobs`
    Jobs,
    /// `/openai/deployments/{deployment}/videos/generations`
    Legacy,
    /// Unified `/openai/v1/videos`
    Videos,
}

impl Route {
    pub fn submit_url(self, ep: &Endpoint) -> String {
        match self {
            Route::Jobs => format!(
                "{}/openai/v1/video/generations/jobs?api-version={}",
                ep.base, ep.api_version
            ),
            Route::Legacy => format!(
                "{}/openai/deployments/{}/videos/generations?api-version={}",
                ep.base, ep.deployment, ep.api_version
            ),
            Route::Videos => format!("{}/openai/v1/videos", ep.base),
        }
    }

    pub fn status_url(self, ep: &Endpoint, job_id: &str) -> String {
        match self {
            Route::Jobs => format!(
                "{}/openai/v1/video/generations/jobs/{job_id}?api-version={}",
                ep.base, ep.api_version
            ),
            Route::Legacy => format!(
                "{}/openai/deployments/{}/videos/generations/{job_id}?api-version={}",
                ep.base, ep.deployment, ep.api_version
            ),
            Route::Videos => format!("{}/openai/v1/videos/{job_id}", ep.base),
        }
    }

    /// Content-retrieval URL for a generated asset, if this route has one.
    ///
    /// For `jobs` the id is a generation id; for `videos` it is the job id.
    pub fn content_url(self, ep: &Endpoint, id: &str) -> Option<String> {
        match self {
            Route::Jobs => Some(format!(
                "{}/openai/v1/video/generations/{id}/content/video?api-version={}",
                ep.base, ep.api_version
            )),
            Route::Legacy => None,
            Route::Videos => Some(format!("{}/openai/v1/videos/{id}/content", ep.base)),
        }
    }

    /// Whether requests on this route also carry `Authorization: Bearer <key>`.
    pub fn uses_bearer(self) -> bool {
        matches!(self, Route::Videos)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Jobs => write!(f, "jobs"),
            Route::Legacy => write!(f, "legacy"),
            Route::Videos => write!(f, "videos"),
        }
    }
}

/// Route selection as configured by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RouteMode {
    Auto,
    Jobs,
    Legacy,
    Videos,
}

impl RouteMode {
    /// Routes to probe, in order.
    pub fn candidates(self) -> Vec<Route> {
        match self {
            RouteMode::Auto => vec![Route::Videos, Route::Jobs, Route::Legacy],
            RouteMode::Jobs => vec![Route::Jobs],
            RouteMode::Legacy => vec![Route::Legacy],
            RouteMode::Videos => vec![Route::Videos],
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMode::Auto => write!(f, "auto"),
            RouteMode::Jobs => write!(f, "jobs"),
            RouteMode::Legacy => write!(f, "legacy"),
            RouteMode::Videos => write!(f, "videos"),
        }
    }
}

impl FromStr for RouteMode {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(RouteMode::Auto),
            "jobs" => Ok(RouteMode::Jobs),
            "legacy" => Ok(RouteMode::Legacy),
            "videos" => Ok(RouteMode::Videos),
            other => Err(MediaError::Config(format!(
                "unknown video route mode {other:?} (expected auto, jobs, legacy or videos)"
            ))),
        }
    }
}
