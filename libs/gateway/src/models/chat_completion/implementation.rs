use crate::models::Models;
use crate::response::IntoResponse;
use crate::GatewayError;

use super::{
    ChatCompletion, ChatCompletionRequest, ChatCompletionResponse,
    CHAT_COMPLETIONS,
};

impl ChatCompletion for Models {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        let body = serde_json::to_string(&request)
            .into_response("failed to serialize chat completion request")?;

        let text = self.string_response(body, CHAT_COMPLETIONS).await?;

        serde_json::from_str(&text)
            .into_response("failed to parse chat completion response")
    }
}
