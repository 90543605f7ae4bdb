use serde_json::Value;

/// Normalized job state, independent of the provider's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
}

// Provider spellings of the terminal states. Anything else is still running.
const STATUS_TABLE: &[(&str, JobStatus)] = &[
    ("succeeded", JobStatus::Succeeded),
    ("completed", JobStatus::Succeeded),
    ("complete", JobStatus::Succeeded),
    ("done", JobStatus::Succeeded),
    ("success", JobStatus::Succeeded),
    ("failed", JobStatus::Failed),
    ("failure", JobStatus::Failed),
    ("error", JobStatus::Failed),
    ("cancelled", JobStatus::Failed),
    ("canceled", JobStatus::Failed),
];

impl JobStatus {
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        STATUS_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(raw))
            .map(|&(_, status)| status)
            .unwrap_or(JobStatus::InProgress)
    }
}

/// The raw `status` string of a status payload, or `"unknown"`.
pub fn raw_status(payload: &Value) -> &str {
    payload["status"].as_str().unwrap_or("unknown")
}

/// Failure message from a terminal failure payload.
pub fn failure_message(payload: &Value) -> String {
    let error = &payload["error"];
    error["message"]
        .as_str()
        .or_else(|| error.as_str())
        .or_else(|| payload["failure_reason"].as_str())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_vocabulary() {
        for s in ["succeeded", "completed", "done", "Succeeded", "COMPLETED"] {
            assert_eq!(JobStatus::normalize(s), JobStatus::Succeeded, "{s}");
        }
    }

    #[test]
    fn failure_vocabulary() {
        for s in ["failed", "error", "cancelled", "canceled", "Failed"] {
            assert_eq!(JobStatus::normalize(s), JobStatus::Failed, "{s}");
        }
    }

    #[test]
    fn unknown_values_are_in_progress() {
        for s in ["queued", "preprocessing", "running", "processing", "unknown", ""] {
            assert_eq!(JobStatus::normalize(s), JobStatus::InProgress, "{s}");
        }
    }

    #[test]
    fn raw_status_defaults_to_unknown() {
        assert_eq!(raw_status(&json!({"id": "1"})), "unknown");
        assert_eq!(raw_status(&json!({"status": "queued"})), "queued");
    }

    #[test]
    fn failure_message_sources() {
        assert_eq!(
            failure_message(&json!({"error": {"code": "x", "message": "moderation blocked"}})),
            "moderation blocked"
        );
        assert_eq!(failure_message(&json!({"error": "boom"})), "boom");
        assert_eq!(
            failure_message(&json!({"failure_reason": "internal_error"})),
            "internal_error"
        );
        assert_eq!(failure_message(&json!({"status": "failed"})), "unknown error");
    }
}
