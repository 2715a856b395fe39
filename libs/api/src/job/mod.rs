use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub mod request;
pub mod response;

use crate::response::ApiResponse;
use crate::{
    analyze, connectivity, generate, suggest, ApiError, ApiState, ErrorEnvelope,
};

use self::request::{GenerationRequest, Job};
use self::response::JobResponse;

/// Run one ad job
#[utoipa::path(
    post,
    path = "/generate-ad-image",
    request_body = GenerationRequest,
    responses(
        (status = 200, description = "Job finished", body = JobResponse),
        (status = 400, description = "Invalid or oversized request", body = ErrorEnvelope),
        (status = 401, description = "Invalid API key", body = ErrorEnvelope),
        (status = 402, description = "Credits depleted", body = ErrorEnvelope),
        (status = 429, description = "Rate limited", body = ErrorEnvelope),
        (status = 500, description = "Upstream failure", body = ErrorEnvelope)
    )
)]
pub async fn generate_ad_image(
    State(state): State<ApiState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse<Json<JobResponse>> {
    let body = body.map_err(|rejection| {
        ApiError::ClientError(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))
    })?;
    let request: GenerationRequest =
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::ClientError(format!("Invalid request body: {}", e))
        })?;

    log_request(&request);

    let response = match Job::try_from(request)? {
        Job::Suggest { prompt, app_role } => JobResponse::Suggestions {
            suggestions: suggest::refine(
                state.gateway()?,
                &state.config.gateway.chat_model,
                &prompt,
                app_role.as_deref(),
            )
            .await?,
        },
        Job::Analyze(source) => JobResponse::Analysis {
            analysis: analyze::analyze(
                state.gateway()?,
                &state.config.gateway.chat_model,
                &source,
            )
            .await?,
        },
        Job::Generate(job) => JobResponse::Variations {
            variations: generate::generate(&state, &job).await?,
        },
        Job::Test { api_key } => JobResponse::Connectivity {
            success: true,
            message: connectivity::probe(&state.external(&api_key)?).await?,
        },
    };

    Ok(Json(response))
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn log_request(request: &GenerationRequest) {
    let prompt: Option<String> = request
        .prompt
        .as_deref()
        .map(|prompt| prompt.chars().take(100).collect());
    let settings = request.api_settings.as_ref();

    info!(
        task = "received job",
        job_type = request.job_type.as_str(),
        prompt = prompt.as_deref(),
        has_image = request.image_base64.is_some(),
        reference_url = request.reference_url.as_deref(),
        app_role = request.app_role.as_deref(),
        use_external_api = settings.map(|s| s.use_external_api),
        provider = settings.map(|s| s.provider.as_str()),
        has_api_key = settings.map(|s| s.api_key.is_some()),
        model = settings.and_then(|s| s.model.as_deref()),
    );
}
