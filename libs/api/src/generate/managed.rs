use gateway::models::chat_completion::{
    ChatCompletion, ChatCompletionRequest, ContentPart, ImageUrl, Message,
    Modality,
};
use tracing::{error, info};

use crate::config;
use crate::job::request::GenerateJob;
use crate::job::response::ImageVariation;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::ApiError;

/// One multimodal call per configured style, in order. Upstream failures
/// abort the batch; a reply without an image only skips its style.
pub(super) async fn generate<C: ChatCompletion + Sync>(
    client: &C,
    model: &str,
    generate: &config::Generate,
    job: &GenerateJob,
) -> ApiResponse<Vec<ImageVariation>> {
    let mut variations = Vec::with_capacity(generate.styles.len());

    for style in &generate.styles {
        let text = generate.managed_prompt(
            style,
            &job.prompt,
            job.app_role.as_deref(),
            job.reference_image.is_some(),
        );

        let mut parts = vec![ContentPart::Text { text }];
        if let Some(image) = &job.reference_image {
            parts.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_uri().to_string(),
                },
            });
        }

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user_parts(parts)],
            modalities: Some(vec![Modality::Image, Modality::Text]),
            ..Default::default()
        };

        let response = client
            .chat_completion(request)
            .await
            .into_response("Image generation error")?;

        let Some(image_url) = response.first_image_url() else {
            error!(
                task = "managed image",
                style = style.name.as_str(),
                "no image url in response"
            );
            continue;
        };

        variations.push(ImageVariation {
            image_url: image_url.to_string(),
            style: style.name.clone(),
        });
    }

    info!(task = "managed images", generated = variations.len());

    if variations.is_empty() {
        return Err(ApiError::ServerError("No images generated".to_string()));
    }

    Ok(variations)
}
