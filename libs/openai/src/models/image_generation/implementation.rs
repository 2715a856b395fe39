use tracing::info;

use crate::models::Models;
use crate::response::IntoResponse;
use crate::OpenAiError;

use super::{
    ImageGeneration, ImageGenerationRequest, ImageGenerationResponse,
    IMAGES_GENERATIONS,
};

impl ImageGeneration for Models {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, OpenAiError> {
        let body = serde_json::to_string(&request)
            .into_response("failed to serialize image generation request")?;

        let text = self.post_string(body, IMAGES_GENERATIONS).await?;

        let response: ImageGenerationResponse = serde_json::from_str(&text)
            .into_response("failed to parse image generation response")?;

        info!(
            task = "generate images",
            model = request.model.as_str(),
            requested = request.n,
            received = response.data.len()
        );

        Ok(response)
    }
}
