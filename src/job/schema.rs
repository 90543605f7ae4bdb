//! Response field names the provider uses for job ids and result URLs.
//!
//! The service has not settled on one schema, so the accepted names are
//! configuration (the `[schema]` table of `azmedia.toml`).

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseSchema {
    /// Fields checked, in order, for the job id of a submission response.
    #[serde(default = "default_job_id_fields")]
    pub job_id_fields: Vec<String>,

    /// URL-like fields checked, in order, at the top level and inside `output`.
    #[serde(default = "default_url_fields")]
    pub url_fields: Vec<String>,
}

fn default_job_id_fields() -> Vec<String> {
    vec!["id".into(), "job_id".into(), "jobId".into()]
}

fn default_url_fields() -> Vec<String> {
    vec!["video_url".into(), "videoUrl".into(), "url".into()]
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self {
            job_id_fields: default_job_id_fields(),
            url_fields: default_url_fields(),
        }
    }
}

impl ResponseSchema {
    /// First non-empty job id. Numeric ids are accepted and stringified.
    pub fn job_id(&self, body: &Value) -> Option<String> {
        self.job_id_fields
            .iter()
            .find_map(|field| id_string(&body[field.as_str()]))
    }

    /// First non-empty URL-like field of `obj`.
    pub fn url_in(&self, obj: &Value) -> Option<String> {
        self.url_fields
            .iter()
            .filter_map(|field| obj[field.as_str()].as_str())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// A non-empty string id, or a numeric one rendered as a string.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
