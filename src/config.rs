//! Configuration loaded from `azmedia.toml`, `.env` and the environment.
//!
//! [`MediaConfig`] holds every setting. Values missing from the file fall back
//! to defaults; environment variables take precedence over the file, and CLI
//! flags (applied by the caller) take precedence over both.

use std::path::Path;

use serde::Deserialize;

use crate::azure::RouteMode;
use crate::error::MediaError;
use crate::job::ResponseSchema;

pub const CONFIG_FILE: &str = "azmedia.toml";

pub const IMAGE_API_VERSION: &str = "2025-04-01-preview";
pub const VIDEO_API_VERSION: &str = "2025-03-01-preview";
pub const IMAGE_TO_VIDEO_API_VERSION: &str = "preview";

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_video_deployment")]
    pub video_deployment: String,

    #[serde(default = "default_image_deployment")]
    pub image_deployment: String,

    /// Overrides the per-command default `api-version`.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Overrides the per-command default route mode. Kept raw so commands
    /// that never pick a route are not affected by a bad value.
    #[serde(default)]
    pub video_api_mode: Option<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    #[serde(default)]
    pub schema: ResponseSchema,
}

fn default_video_deployment() -> String {
    "sora".to_string()
}

fn default_image_deployment() -> String {
    "gpt-image-1".to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_max_wait_secs() -> u64 {
    600
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            video_deployment: default_video_deployment(),
            image_deployment: default_image_deployment(),
            api_version: None,
            video_api_mode: None,
            poll_interval_secs: default_poll_interval_secs(),
            max_wait_secs: default_max_wait_secs(),
            schema: ResponseSchema::default(),
        }
    }
}

impl MediaConfig {
    /// Load the config file (explicit path, or `azmedia.toml` if present),
    /// then `.env`, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, MediaError> {
        let mut config = match path {
            Some(p) if !p.exists() => {
                return Err(MediaError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p) => Self::from_file(p)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };

        // Never overrides variables that are already set.
        check_dotenv(dotenvy::dotenv())?;

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, MediaError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Overlay environment variables; empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), MediaError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("AZURE_OPENAI_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = var("AZURE_OPENAI_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = var("AZURE_OPENAI_SORA_DEPLOYMENT") {
            self.video_deployment = v;
        }
        if let Some(v) = var("AZURE_OPENAI_DALLE_DEPLOYMENT") {
            self.image_deployment = v;
        }
        if let Some(v) = var("AZURE_OPENAI_API_VERSION") {
            self.api_version = Some(v);
        }
        if let Some(v) = var("AZURE_OPENAI_VIDEO_API_MODE") {
            self.video_api_mode = Some(v);
        }
        if let Some(v) = var("AZMEDIA_POLL_INTERVAL") {
            self.poll_interval_secs = parse_secs("AZMEDIA_POLL_INTERVAL", &v)?;
        }
        if let Some(v) = var("AZMEDIA_MAX_WAIT") {
            self.max_wait_secs = parse_secs("AZMEDIA_MAX_WAIT", &v)?;
        }
        Ok(())
    }

    /// Reject configurations that cannot make a request. Runs before any network call.
    pub fn validate(&self) -> Result<(), MediaError> {
        if self.endpoint.trim().is_empty() || self.api_key.trim().is_empty() {
            return Err(MediaError::Config(format!(
                "set AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY (environment, .env or {CONFIG_FILE})"
            )));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(MediaError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(MediaError::Config("poll interval must be at least 1 second".into()));
        }
        Ok(())
    }

    /// Route mode from the file or environment, parsed on first use.
    pub fn video_api_mode(&self) -> Result<Option<RouteMode>, MediaError> {
        self.video_api_mode.as_deref().map(str::parse::<RouteMode>).transpose()
    }

    pub fn api_version_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.api_version.as_deref().unwrap_or(default)
    }
}

/// A missing `.env` is fine; one that exists but cannot be read or parsed is not.
fn check_dotenv<T>(result: Result<T, dotenvy::Error>) -> Result<(), MediaError> {
    match result {
        Err(e) if !e.not_found() => Err(MediaError::Config(format!("cannot load .env: {e}"))),
        _ => Ok(()),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, MediaError> {
    value
        .trim()
        .parse()
        .map_err(|_| MediaError::Config(format!("{key} must be a whole number of seconds, got {value:?}")))
}
