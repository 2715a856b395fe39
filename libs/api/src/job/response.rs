use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema, Debug)]
#[serde(untagged)]
pub enum JobResponse {
    Suggestions {
        suggestions: Vec<CreativeSuggestion>,
    },
    Analysis {
        analysis: String,
    },
    Variations {
        variations: Vec<ImageVariation>,
    },
    Connectivity {
        success: bool,
        message: String,
    },
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct CreativeSuggestion {
    #[schema(example = "Cinematic Editorial")]
    pub title: String,
    pub prompt: String,
    pub description: String,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageVariation {
    pub image_url: String,
    #[schema(example = "Sophisticated Luxury")]
    pub style: String,
}
