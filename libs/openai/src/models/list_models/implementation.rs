use crate::models::Models;
use crate::response::IntoResponse;
use crate::OpenAiError;

use super::{ListModels, ModelList, MODELS};

impl ListModels for Models {
    async fn list_models(&self) -> Result<ModelList, OpenAiError> {
        let text = self.get_string(MODELS).await?;

        serde_json::from_str(&text)
            .into_response("failed to parse model list response")
    }
}
