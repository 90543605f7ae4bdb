//! Image generation. The endpoint answers synchronously, so there is no polling.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info};

use crate::azure::AzureClient;
use crate::azure::client::provider_message;
use crate::azure::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::download::{MediaSource, download, prepare_parent};
use crate::error::MediaError;

/// Generation is synchronous and can take minutes at high quality.
const IMAGE_TIMEOUT: Duration = Duration::from_secs(300);

/// Generate one image and save it to `dest`, returning the absolute path.
///
/// Inline `b64_json` data is decoded and written directly; otherwise the
/// returned `url` is downloaded without credentials. A response with neither
/// is [`MediaError::MissingResult`].
pub async fn generate_image(
    client: &AzureClient,
    request: &ImageGenerationRequest,
    dest: &Path,
) -> Result<PathBuf, MediaError> {
    let url = client.endpoint().image_generation_url();
    let body = serde_json::to_value(request)?;
    let resp = client.post_json(&url, &body, None, IMAGE_TIMEOUT).await?;

    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(MediaError::Submission {
            status: status.as_u16(),
            body: provider_message(&text),
        });
    }

    let parsed: ImageGenerationResponse = serde_json::from_str(&text)?;
    let Some(image) = parsed.data.into_iter().next() else {
        return Err(MediaError::MissingResult { payload: text });
    };
    if let Some(revised) = &image.revised_prompt {
        debug!(revised_prompt = %revised, "provider revised the prompt");
    }

    if let Some(b64) = image.b64_json.filter(|s| !s.is_empty()) {
        let bytes = STANDARD.decode(b64.as_bytes())?;
        prepare_parent(dest).await?;
        tokio::fs::write(dest, &bytes).await?;
        info!(path = %dest.display(), bytes = bytes.len(), "image written");
        return Ok(tokio::fs::canonicalize(dest).await?);
    }

    match image.url.filter(|s| !s.is_empty()) {
        Some(url) => download(client, &MediaSource::Direct(url), dest).await,
        None => Err(MediaError::MissingResult { payload: text }),
    }
}
