use openai::models::image_generation::{
    ImageGeneration, ImageGenerationRequest,
};
use tracing::info;

use crate::config;
use crate::job::response::ImageVariation;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::ApiError;

/// One batched request; labels follow response order, not image content.
pub(super) async fn generate<G: ImageGeneration + Sync>(
    client: &G,
    openai: &config::OpenAi,
    generate: &config::Generate,
    model: Option<&str>,
    prompt: &str,
) -> ApiResponse<Vec<ImageVariation>> {
    let request = ImageGenerationRequest {
        model: model.unwrap_or(openai.image_model.as_str()).to_string(),
        prompt: generate.external_prompt(prompt),
        n: openai.image_count,
        size: openai.image_size.clone(),
        quality: openai.image_quality.clone(),
        style: openai.image_style.clone(),
    };
    info!(
        task = "external image request",
        model = request.model.as_str(),
        n = request.n
    );

    let response = client
        .generate_images(request)
        .await
        .into_response("OpenAI API error")?;

    if response.data.is_empty() {
        return Err(ApiError::ServerError("No images generated".to_string()));
    }

    response
        .data
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let image_url = image.displayable_url().ok_or_else(|| {
                ApiError::ServerError(format!(
                    "No image data in provider response for image {}",
                    index + 1
                ))
            })?;

            Ok(ImageVariation {
                image_url,
                style: generate.external_label(index).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::generate;
    use crate::test_util::{test_config, ScriptedImages};
    use crate::ApiError;

    #[tokio::test]
    async fn test_requests_configured_batch() {
        // Arrange
        let config = test_config();
        let client = ScriptedImages::new(json!([
            { "url": "https://img.example/1.png" },
            { "b64_json": "QUJD" }
        ]));

        // Act
        let variations = generate(
            &client,
            &config.openai,
            &config.generate,
            Some("dall-e-3"),
            "coffee",
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(variations[0].style, "Editorial Premium");
        assert_eq!(variations[1].style, "Cinematic Luxury");
        assert_eq!(variations[1].image_url, "data:image/png;base64,QUJD");

        let requests = client.requests();
        assert_eq!(requests[0]["n"], 2);
        assert_eq!(requests[0]["model"], "dall-e-3");
        assert_eq!(requests[0]["size"], "1024x1536");
        assert!(requests[0]["prompt"]
            .as_str()
            .unwrap()
            .contains("sophisticated composition: coffee."));
    }

    #[tokio::test]
    async fn test_empty_batch_fails() {
        // Arrange
        let config = test_config();
        let client = ScriptedImages::new(json!([]));

        // Act
        let result =
            generate(&client, &config.openai, &config.generate, None, "coffee")
                .await;

        // Assert
        let Err(ApiError::ServerError(message)) = result else {
            panic!("expected server error");
        };
        assert_eq!(message, "No images generated");
        assert_eq!(client.requests()[0]["model"], "gpt-image-1");
    }

    #[tokio::test]
    async fn test_item_without_data_fails_batch() {
        // Arrange
        let config = test_config();
        let client = ScriptedImages::new(json!([
            { "url": "https://img.example/1.png" },
            { "revised_prompt": "coffee, but nothing came back" }
        ]));

        // Act
        let result =
            generate(&client, &config.openai, &config.generate, None, "coffee")
                .await;

        // Assert
        let Err(ApiError::ServerError(message)) = result else {
            panic!("expected server error");
        };
        assert_eq!(message, "No image data in provider response for image 2");
    }

    #[tokio::test]
    async fn test_rate_limit() {
        // Arrange
        let config = test_config();
        let client = ScriptedImages::failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached"}}"#,
        );

        // Act
        let result =
            generate(&client, &config.openai, &config.generate, None, "coffee")
                .await;

        // Assert
        let Err(ApiError::RateLimitError(message)) = result else {
            panic!("expected rate limit error");
        };
        assert_eq!(
            message,
            "OpenAI rate limit exceeded. Please try again later."
        );
    }
}
