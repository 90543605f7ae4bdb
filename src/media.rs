//! Reference images for image-to-video, embedded in requests as data URIs.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::MediaError;

/// A reference image read from disk and base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// MIME type picked from the file extension.
    pub mime_type: &'static str,
    /// Standard-alphabet base64 of the file contents.
    pub base64: String,
    /// Size of the original file in bytes.
    pub byte_len: usize,
}

/// PNG, JPEG and WEBP only; matching is case-insensitive.
fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl ImageAttachment {
    /// Read and encode `path`. The file must exist and carry a supported extension.
    pub fn from_path(path: &Path) -> Result<Self, MediaError> {
        if !path.is_file() {
            return Err(MediaError::ImageNotFound {
                path: path.to_path_buf(),
            });
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let mime_type = mime_for_extension(ext).ok_or_else(|| MediaError::UnsupportedImage {
            extension: ext.to_string(),
        })?;

        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), mime_type, bytes = bytes.len(), "encoded reference image");

        Ok(Self {
            mime_type,
            base64: STANDARD.encode(&bytes),
            byte_len: bytes.len(),
        })
    }

    /// `data:<mime>;base64,<payload>`, the form every video route accepts.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// File size in MiB, for display.
    pub fn size_mb(&self) -> f64 {
        self.byte_len as f64 / (1024.0 * 1024.0)
    }
}
