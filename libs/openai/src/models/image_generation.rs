pub mod implementation;

use serde::{Deserialize, Serialize};

use crate::OpenAiError;

static IMAGES_GENERATIONS: &str = "images/generations";

pub trait ImageGeneration {
    fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> impl std::future::Future<
        Output = Result<ImageGenerationResponse, OpenAiError>,
    > + Send;
}

#[derive(Debug, Serialize, Default)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// One generated image; hosted models answer with `url`, newer ones inline
/// the bytes as `b64_json`.
#[derive(Debug, Deserialize, Default)]
pub struct ImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

impl ImageData {
    /// Something a browser can put in `src`.
    pub fn displayable_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|url| !url.is_empty()) {
            return Some(url.to_string());
        }
        self.b64_json
            .as_deref()
            .filter(|data| !data.is_empty())
            .map(|data| format!("data:image/png;base64,{}", data))
    }
}
