use gateway::models::chat_completion::{
    ChatCompletion, ChatCompletionRequest, Message,
};
use tracing::error;

use crate::job::request::AnalysisSource;
use crate::response::ApiResponse;
use crate::ApiError;

const SYSTEM_PROMPT: &str = "You are an expert at analyzing advertisements. \
    Extract key visual elements, messaging strategies, and creative concepts \
    from the description or reference.";

fn analysis_prompt(source: &AnalysisSource) -> String {
    match source {
        AnalysisSource::Reference(url) => format!(
            "Analyze this advertisement reference: {}. Describe the visual \
             style, color palette, composition, messaging approach, and \
             target audience. Then create a detailed prompt for generating \
             a similar ad.",
            url
        ),
        AnalysisSource::Concept(prompt) => format!(
            "Analyze this advertisement concept: {}. Provide insights on \
             visual style, messaging, and target audience, then create an \
             optimized prompt for generating a similar ad.",
            prompt
        ),
    }
}

pub(crate) async fn analyze<C: ChatCompletion + Sync>(
    client: &C,
    model: &str,
    source: &AnalysisSource,
) -> ApiResponse<String> {
    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(analysis_prompt(source)),
        ],
        ..Default::default()
    };

    let response = client.chat_completion(request).await.map_err(|e| {
        error!(task = "analysis", error = e.to_string());
        match e.status_code() {
            Some(status_code) => ApiError::ServerError(format!(
                "Analysis error: {}",
                status_code.as_u16()
            )),
            None => ApiError::ServerError(format!("Analysis error: {}", e)),
        }
    })?;

    response
        .content()
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            ApiError::ServerError("No analysis in response".to_string())
        })
}
