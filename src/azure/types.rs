//! Request and response bodies for the image generation endpoint.
//!
//! Video payloads differ per route and are assembled as `serde_json::Value`
//! in [`crate::video::submit`]; image generation has one stable shape and is
//! modelled with plain structs.

use serde::{Deserialize, Serialize};

/// Output dimensions accepted by `gpt-image-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ImageSize {
    #[serde(rename = "1024x1024")]
    #[value(name = "1024x1024")]
    Square,
    #[serde(rename = "1024x1536")]
    #[value(name = "1024x1536")]
    Portrait,
    #[serde(rename = "1536x1024")]
    #[value(name = "1536x1024")]
    Landscape,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Portrait => "1024x1536",
            ImageSize::Landscape => "1536x1024",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    Medium,
    High,
}

impl ImageQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageQuality::Low => "low",
            ImageQuality::Medium => "medium",
            ImageQuality::High => "high",
        }
    }
}

/// Body for `POST …/images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub quality: ImageQuality,
    /// Number of images; always 1 here.
    pub n: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// One generated image. `gpt-image-1` returns `b64_json`; older models return `url`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_wire_names() {
        let req = ImageGenerationRequest {
            prompt: "a red fox".into(),
            size: ImageSize::Portrait,
            quality: ImageQuality::High,
            n: 1,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["size"], "1024x1536");
        assert_eq!(v["quality"], "high");
        assert_eq!(v["n"], 1);
    }

    #[test]
    fn response_accepts_b64_or_url() {
        let json = r#"{"created": 1, "data": [{"b64_json": "aGk="}, {"url": "https://x/y.png"}]}"#;
        let resp: ImageGenerationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].b64_json.as_deref(), Some("aGk="));
        assert!(resp.data[0].url.is_none());
        assert_eq!(resp.data[1].url.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn response_without_data_is_empty() {
        let resp: ImageGenerationResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.data.is_empty());
    }
}
