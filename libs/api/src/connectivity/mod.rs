use axum::http::StatusCode;
use openai::models::list_models::ListModels;
use tracing::{error, info};

use crate::response::ApiResponse;
use crate::ApiError;

/// Verifies a caller key with one authenticated capability listing.
pub(crate) async fn probe<L: ListModels + Sync>(
    client: &L,
) -> ApiResponse<String> {
    info!(task = "testing api connection");

    let models = client.list_models().await.map_err(|e| {
        error!(task = "api connection test", error = e.to_string());
        match e.status_code() {
            Some(StatusCode::UNAUTHORIZED) => {
                ApiError::AuthError("Invalid API key".to_string())
            }
            Some(status_code) => ApiError::ServerError(format!(
                "API test failed: {}",
                status_code.as_u16()
            )),
            None => ApiError::ServerError(format!("API test failed: {}", e)),
        }
    })?;

    info!(task = "api connection ok", models = models.data.len());

    Ok("API connection successful".to_string())
}
