use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::ApiError;

/// Wire shape of a job. `type` selects the handler and defaults to
/// `suggest`.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(rename = "type", default = "default_job_type")]
    #[schema(example = "generate")]
    pub job_type: String,
    #[schema(example = "wireless earbuds")]
    pub prompt: Option<String>,
    pub reference_url: Option<String>,
    /// Data URI or raw base64 of a reference image.
    pub image_base64: Option<String>,
    /// Brand context woven into every prompt.
    pub app_role: Option<String>,
    pub api_settings: Option<ProviderSettings>,
}

fn default_job_type() -> String {
    "suggest".to_string()
}

#[derive(Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default)]
    pub use_external_api: bool,
    #[serde(default)]
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[default]
    #[serde(alias = "lovable")]
    Managed,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Managed => "managed",
        }
    }
}

/// A validated job; every variant carries exactly what its handler needs.
#[derive(Debug, PartialEq, Eq)]
pub enum Job {
    Suggest {
        prompt: String,
        app_role: Option<String>,
    },
    Analyze(AnalysisSource),
    Generate(GenerateJob),
    Test {
        api_key: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum AnalysisSource {
    Reference(String),
    Concept(String),
}

#[derive(Debug, PartialEq, Eq)]
pub struct GenerateJob {
    pub prompt: String,
    pub reference_image: Option<ReferenceImage>,
    pub app_role: Option<String>,
    pub route: ProviderRoute,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProviderRoute {
    Managed,
    External {
        api_key: String,
        model: Option<String>,
    },
}

/// Reference image normalised to a `data:` URI.
#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceImage(String);

impl ReferenceImage {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let raw = raw.trim();
        if raw.starts_with("data:") {
            return Ok(Self(raw.to_string()));
        }

        let bytes = STANDARD.decode(raw).map_err(|_| {
            ApiError::ClientError(
                "imageBase64 is not a valid base64 image".to_string(),
            )
        })?;
        let mime_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or("image/png");

        Ok(Self(format!("data:{};base64,{}", mime_type, raw)))
    }

    pub fn data_uri(&self) -> &str {
        &self.0
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn required_prompt(prompt: Option<String>) -> Result<String, ApiError> {
    non_blank(prompt)
        .ok_or_else(|| ApiError::ClientError("Prompt is required".to_string()))
}

fn provider_route(
    settings: Option<ProviderSettings>,
) -> Result<ProviderRoute, ApiError> {
    let Some(settings) = settings.filter(|s| s.use_external_api) else {
        return Ok(ProviderRoute::Managed);
    };

    let api_key = non_blank(settings.api_key).ok_or_else(|| {
        ApiError::ClientError(
            "External API key is required when external API is enabled"
                .to_string(),
        )
    })?;

    Ok(ProviderRoute::External {
        api_key,
        model: non_blank(settings.model),
    })
}

impl TryFrom<GenerationRequest> for Job {
    type Error = ApiError;

    fn try_from(request: GenerationRequest) -> Result<Self, Self::Error> {
        let app_role = non_blank(request.app_role);

        match request.job_type.as_str() {
            "test" => {
                let api_key = request
                    .api_settings
                    .filter(|settings| settings.use_external_api)
                    .and_then(|settings| non_blank(settings.api_key))
                    .ok_or_else(|| {
                        ApiError::ClientError(
                            "API settings not provided for test".to_string(),
                        )
                    })?;
                Ok(Job::Test { api_key })
            }
            "suggest" => {
                provider_route(request.api_settings)?;
                Ok(Job::Suggest {
                    prompt: required_prompt(request.prompt)?,
                    app_role,
                })
            }
            "analyze" => {
                provider_route(request.api_settings)?;
                let source = match (
                    non_blank(request.reference_url),
                    non_blank(request.prompt),
                ) {
                    (Some(url), _) => AnalysisSource::Reference(url),
                    (None, Some(prompt)) => AnalysisSource::Concept(prompt),
                    (None, None) => {
                        return Err(ApiError::ClientError(
                            "Either referenceUrl or prompt is required"
                                .to_string(),
                        ));
                    }
                };
                Ok(Job::Analyze(source))
            }
            "generate" => {
                let route = provider_route(request.api_settings)?;
                let reference_image = non_blank(request.image_base64)
                    .map(|raw| ReferenceImage::parse(&raw))
                    .transpose()?;
                Ok(Job::Generate(GenerateJob {
                    prompt: required_prompt(request.prompt)?,
                    reference_image,
                    app_role,
                    route,
                }))
            }
            _ => Err(ApiError::ClientError(
                "Invalid type parameter".to_string(),
            )),
        }
    }
}
