pub mod implementation;

use serde::Deserialize;

use crate::OpenAiError;

static MODELS: &str = "models";

/// Capability listing, used as a cheap authenticated probe.
pub trait ListModels {
    fn list_models(
        &self,
    ) -> impl std::future::Future<Output = Result<ModelList, OpenAiError>> + Send;
}

#[derive(Debug, Deserialize, Default)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}
