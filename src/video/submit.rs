use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::debug;

use super::size::VideoSize;
use crate::azure::client::provider_message;
use crate::azure::{AzureClient, Route};
use crate::error::MediaError;
use crate::job::ResponseSchema;
use crate::media::ImageAttachment;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
// Requests carrying an inline image are much larger.
const SUBMIT_WITH_IMAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// What to generate. Validated before any network call.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompt: String,
    pub size: VideoSize,
    pub seconds: u32,
    pub image: Option<ImageAttachment>,
}

impl VideoRequest {
    /// Route-specific JSON body.
    pub fn payload(&self, route: Route, deployment: &str) -> Value {
        let mut body = match route {
            Route::Jobs => json!({
                "prompt": self.prompt,
                "n_variants": "1",
                "n_seconds": self.seconds.to_string(),
                "height": self.size.height.to_string(),
                "width": self.size.width.to_string(),
                "model": deployment,
            }),
            Route::Legacy => json!({
                "prompt": self.prompt,
                "size": self.size.to_string(),
                "n_seconds": self.seconds,
            }),
            Route::Videos => json!({
                "model": deployment,
                "prompt": self.prompt,
                "size": self.size.to_string(),
                "seconds": self.seconds.to_string(),
            }),
        };

        if let Some(image) = &self.image
            && let Some(obj) = body.as_object_mut()
        {
            insert_image(obj, route, image.data_uri());
        }
        body
    }
}

fn insert_image(obj: &mut Map<String, Value>, route: Route, data_uri: String) {
    let key = match route {
        Route::Videos => "input_reference",
        Route::Jobs | Route::Legacy => "image",
    };
    obj.insert(key.to_string(), Value::String(data_uri));
}

/// Submit the job and return its id.
pub async fn submit(
    client: &AzureClient,
    route: Route,
    request: &VideoRequest,
    schema: &ResponseSchema,
) -> Result<String, MediaError> {
    let url = route.submit_url(client.endpoint());
    let payload = request.payload(route, client.endpoint().deployment());
    let timeout = if request.image.is_some() {
        SUBMIT_WITH_IMAGE_TIMEOUT
    } else {
        SUBMIT_TIMEOUT
    };

    let resp = client.post_json(&url, &payload, Some(route), timeout).await?;
    let status = resp.status().as_u16();
    let body = resp.text().await?;

    if !matches!(status, 200..=202) {
        return Err(MediaError::Submission {
            status,
            body: provider_message(&body),
        });
    }

    let data: Value = serde_json::from_str(&body)?;
    let job_id = schema
        .job_id(&data)
        .ok_or(MediaError::MissingJobId { body })?;
    debug!(%route, %job_id, "video job submitted");
    Ok(job_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::Endpoint;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> VideoRequest {
        VideoRequest {
            prompt: "a cat surfing".into(),
            size: VideoSize { width: 854, height: 480 },
            seconds: 5,
            image: None,
        }
    }

    #[test]
    fn jobs_payload_uses_separate_string_dimensions() {
        let body = request().payload(Route::Jobs, "sora");
        assert_eq!(
            body,
            json!({
                "prompt": "a cat surfing",
                "n_variants": "1",
                "n_seconds": "5",
                "height": "480",
                "width": "854",
                "model": "sora",
            })
        );
    }

    #[test]
    fn legacy_payload_uses_combined_size_and_numeric_seconds() {
        let body = request().payload(Route::Legacy, "sora");
        assert_eq!(
            body,
            json!({"prompt": "a cat surfing", "size": "854x480", "n_seconds": 5})
        );
    }

    #[test]
    fn videos_payload_uses_seconds_string() {
        let body = request().payload(Route::Videos, "sora-2");
        assert_eq!(body["seconds"], "5");
        assert_eq!(body["size"], "854x480");
        assert_eq!(body["model"], "sora-2");
        assert!(body.get("n_seconds").is_none());
    }

    #[test]
    fn image_is_embedded_per_route() {
        let mut req = request();
        req.image = Some(ImageAttachment {
            mime_type: "image/png",
            base64: "aGk=".into(),
            byte_len: 2,
        });
        assert_eq!(req.payload(Route::Jobs, "sora")["image"], "data:image/png;base64,aGk=");
        assert_eq!(req.payload(Route::Legacy, "sora")["image"], "data:image/png;base64,aGk=");
        assert_eq!(
            req.payload(Route::Videos, "sora")["input_reference"],
            "data:image/png;base64,aGk="
        );
    }

    async fn setup() -> (MockServer, AzureClient) {
        let server = MockServer::start().await;
        let client = AzureClient::new(Endpoint::new(&server.uri(), "sora", "preview"), "key".into()).unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn extracts_alternate_job_id_field() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/sora/videos/generations"))
            .and(query_param("api-version", "preview"))
            .and(body_json(request().payload(Route::Legacy, "sora")))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"jobId": "legacy-7"})))
            .expect(1)
            .mount(&server)
            .await;

        let id = submit(&client, Route::Legacy, &request(), &ResponseSchema::default())
            .await
            .unwrap();
        assert_eq!(id, "legacy-7");
    }

    #[tokio::test]
    async fn rejected_submission_carries_status_and_message() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/video/generations/jobs"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "Invalid n_seconds"}})),
            )
            .mount(&server)
            .await;

        let err = submit(&client, Route::Jobs, &request(), &ResponseSchema::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MediaError::Submission { status: 400, ref body } if body == "Invalid n_seconds"
        ));
    }

    #[tokio::test]
    async fn missing_job_id_is_fatal() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/video/generations/jobs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let err = submit(&client, Route::Jobs, &request(), &ResponseSchema::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::MissingJobId { .. }));
    }
}
