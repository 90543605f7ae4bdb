use std::path::PathBuf;

use thiserror::Error;

/// Every way a generation run can fail. Each variant ends the run.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Missing or malformed settings from the file, `.env` or environment.
    #[error("Config error: {0}")]
    Config(String),

    /// A video size that is not `<width>x<height>` with positive integers.
    #[error("invalid size {size:?}: expected <width>x<height> with positive integers, e.g. 854x480")]
    InvalidSize { size: String },

    #[error("image file not found: {}", .path.display())]
    ImageNotFound { path: PathBuf },

    #[error("unsupported image format {extension:?} (supported: PNG, JPG, JPEG, WEBP)")]
    UnsupportedImage { extension: String },

    /// The resource could not be reached while probing or submitting.
    #[error("cannot reach {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 401/403 during probing.
    #[error("route probe rejected with HTTP {status}, check the API key or access rights: {body}")]
    Unauthorized { status: u16, body: String },

    /// Every probed route answered 404. `probed` keeps probe order.
    #[error("{}", route_not_found_message(.endpoint, .deployment, .api_version, .mode, .probed))]
    RouteNotFound {
        endpoint: String,
        deployment: String,
        api_version: String,
        mode: String,
        probed: Vec<String>,
    },

    /// The provider rejected a submission; `body` is its message when it sent one.
    #[error("submission failed (HTTP {status}): {body}")]
    Submission { status: u16, body: String },

    #[error("no job id in submission response: {body}")]
    MissingJobId { body: String },

    /// The job reached a failure status.
    #[error("generation failed: {message}")]
    JobFailed { message: String },

    /// `max_wait` elapsed without a terminal status.
    #[error("generation timed out after {waited_secs}s")]
    Timeout { waited_secs: u64 },

    /// A finished job or image response with nothing to download.
    #[error("no downloadable result in response: {payload}")]
    MissingResult { payload: String },

    #[error("download from {url} failed (HTTP {status})")]
    Download { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

fn route_not_found_message(
    endpoint: &str,
    deployment: &str,
    api_version: &str,
    mode: &str,
    probed: &[String],
) -> String {
    let mut msg = format!(
        "no video generation route is exposed by this resource (HTTP 404)\n  \
         endpoint: {endpoint}\n  deployment: {deployment}\n  api-version: {api_version}\n  \
         route mode: {mode}\nprobed routes:"
    );
    for url in probed {
        msg.push_str("\n  - ");
        msg.push_str(url);
    }
    msg
}
