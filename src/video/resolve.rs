use serde_json::Value;

use crate::azure::{Endpoint, Route};
use crate::download::MediaSource;
use crate::error::MediaError;
use crate::job::{ResponseSchema, id_string};

/// Work out where the finished media can be fetched from.
///
/// Checks, in order: top-level URL fields, the same fields inside `output`,
/// and `generations[0].video.url`. Without a URL, routes that have a content
/// endpoint fall back to it; `legacy` has none and fails.
pub fn resolve_result(
    payload: &Value,
    route: Route,
    job_id: &str,
    endpoint: &Endpoint,
    schema: &ResponseSchema,
) -> Result<MediaSource, MediaError> {
    let direct = schema
        .url_in(payload)
        .or_else(|| payload.get("output").and_then(|o| schema.url_in(o)))
        .or_else(|| {
            payload["generations"][0]["video"]["url"]
                .as_str()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        });
    if let Some(url) = direct {
        return Ok(MediaSource::Direct(url));
    }

    let content_id = match route {
        Route::Jobs => id_string(&payload["generations"][0]["id"]),
        Route::Videos => Some(job_id.to_string()),
        Route::Legacy => None,
    };

    content_id
        .and_then(|id| route.content_url(endpoint, &id))
        .map(|url| MediaSource::Content { url, route })
        .ok_or_else(|| MediaError::MissingResult {
            payload: payload.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ep() -> Endpoint {
        Endpoint::new("https://res.openai.azure.com", "sora", "preview")
    }

    fn resolve(payload: Value, route: Route) -> Result<MediaSource, MediaError> {
        resolve_result(&payload, route, "job-1", &ep(), &ResponseSchema::default())
    }

    #[test]
    fn top_level_url_wins() {
        let src = resolve(
            json!({
                "videoUrl": "https://cdn/top.mp4",
                "output": {"video_url": "https://cdn/out.mp4"},
            }),
            Route::Legacy,
        )
        .unwrap();
        assert_eq!(src, MediaSource::Direct("https://cdn/top.mp4".into()));
    }

    #[test]
    fn nested_output_url() {
        let src = resolve(json!({"output": {"videoUrl": "https://cdn/out.mp4"}}), Route::Legacy).unwrap();
        assert_eq!(src, MediaSource::Direct("https://cdn/out.mp4".into()));
    }

    #[test]
    fn generations_video_url_when_others_absent() {
        let src = resolve(
            json!({
                "status": "succeeded",
                "generations": [{"id": "gen_1", "video": {"url": "https://cdn/gen.mp4"}}],
            }),
            Route::Jobs,
        )
        .unwrap();
        assert_eq!(src, MediaSource::Direct("https://cdn/gen.mp4".into()));
    }

    #[test]
    fn jobs_falls_back_to_generation_content_endpoint() {
        let src = resolve(json!({"generations": [{"id": "gen_1"}]}), Route::Jobs).unwrap();
        assert_eq!(
            src,
            MediaSource::Content {
                url: "https://res.openai.azure.com/openai/v1/video/generations/gen_1/content/video?api-version=preview".into(),
                route: Route::Jobs,
            }
        );
    }

    #[test]
    fn jobs_accepts_numeric_generation_id() {
        let src = resolve(json!({"generations": [{"id": 42}]}), Route::Jobs).unwrap();
        assert_eq!(
            src.url(),
            "https://res.openai.azure.com/openai/v1/video/generations/42/content/video?api-version=preview"
        );
    }

    #[test]
    fn jobs_without_generations_is_unresolvable() {
        let err = resolve(json!({"status": "succeeded"}), Route::Jobs).unwrap_err();
        assert!(matches!(err, MediaError::MissingResult { .. }));
    }

    #[test]
    fn videos_falls_back_to_job_content_endpoint() {
        let src = resolve(json!({"id": "job-1", "status": "completed"}), Route::Videos).unwrap();
        assert_eq!(
            src,
            MediaSource::Content {
                url: "https://res.openai.azure.com/openai/v1/videos/job-1/content".into(),
                route: Route::Videos,
            }
        );
    }

    #[test]
    fn legacy_without_url_is_unresolvable() {
        let err = resolve(json!({"generations": [{"id": "gen_1"}]}), Route::Legacy).unwrap_err();
        assert!(matches!(err, MediaError::MissingResult { ref payload } if payload.contains("gen_1")));
    }
}
