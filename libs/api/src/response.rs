use axum::{http::StatusCode, response::IntoResponse, Json};
use gateway::GatewayError;
use openai::OpenAiError;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::ApiError;

pub(crate) const RATE_LIMITED: &str =
    "Rate limit exceeded. Please try again in a moment.";
pub(crate) const CREDITS_DEPLETED: &str =
    "Credits depleted. Please add credits to continue.";
pub(crate) const INVALID_OPENAI_KEY: &str =
    "Invalid OpenAI API key. Please check your API key in settings.";
pub(crate) const OPENAI_RATE_LIMITED: &str =
    "OpenAI rate limit exceeded. Please try again later.";

/// Body of every failed response.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ClientError(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthError(_) => StatusCode::UNAUTHORIZED,
            ApiError::QuotaExhaustedError(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::NotFoundError(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimitError(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            error!(status = status_code.as_u16(), error = self.to_string());
        } else {
            warn!(status = status_code.as_u16(), error = self.to_string());
        }

        let envelope = ErrorEnvelope {
            error: self.to_string(),
        };
        (status_code, Json(envelope)).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, message: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for Result<T, GatewayError> {
    fn into_response(self, message: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(task = message, error = e.to_string());

            match e.status_code() {
                Some(StatusCode::TOO_MANY_REQUESTS) => {
                    ApiError::RateLimitError(RATE_LIMITED.to_string())
                }
                Some(StatusCode::PAYMENT_REQUIRED) => {
                    ApiError::QuotaExhaustedError(CREDITS_DEPLETED.to_string())
                }
                Some(status_code) => ApiError::ServerError(format!(
                    "{}: {}",
                    message,
                    status_code.as_u16()
                )),
                None => ApiError::ServerError(format!("{}: {}", message, e)),
            }
        })
    }
}

impl<T> IntoApiResponse<T> for Result<T, OpenAiError> {
    fn into_response(self, message: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(task = message, error = e.to_string());

            match e {
                OpenAiError::FailedStatusCode { status_code, .. }
                    if status_code == StatusCode::UNAUTHORIZED =>
                {
                    ApiError::AuthError(INVALID_OPENAI_KEY.to_string())
                }
                OpenAiError::FailedStatusCode { status_code, .. }
                    if status_code == StatusCode::TOO_MANY_REQUESTS =>
                {
                    ApiError::RateLimitError(OPENAI_RATE_LIMITED.to_string())
                }
                OpenAiError::FailedStatusCode {
                    status_code,
                    message: body,
                } => ApiError::ServerError(format!(
                    "{}: {} - {}",
                    message,
                    status_code.as_u16(),
                    body
                )),
                e => ApiError::ServerError(format!("{}: {}", message, e)),
            }
        })
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use gateway::GatewayError;
    use openai::OpenAiError;

    use super::IntoApiResponse;
    use crate::ApiError;

    fn gateway_failure(status_code: StatusCode) -> ApiError {
        let result: Result<(), _> = Err(GatewayError::FailedStatusCode {
            status_code,
            message: "upstream said no".to_string(),
        });
        result.into_response("AI Gateway error").unwrap_err()
    }

    fn openai_failure(status_code: StatusCode) -> ApiError {
        let result: Result<(), _> = Err(OpenAiError::FailedStatusCode {
            status_code,
            message: "{\"error\":\"nope\"}".to_string(),
        });
        result.into_response("OpenAI API error").unwrap_err()
    }

    #[test]
    fn test_gateway_status_mapping() {
        // Act
        let rate_limited = gateway_failure(StatusCode::TOO_MANY_REQUESTS);
        let depleted = gateway_failure(StatusCode::PAYMENT_REQUIRED);
        let unavailable = gateway_failure(StatusCode::SERVICE_UNAVAILABLE);

        // Assert
        assert_eq!(rate_limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(depleted.status_code(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            unavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(unavailable.to_string(), "AI Gateway error: 503");
    }

    #[test]
    fn test_openai_status_mapping() {
        // Act
        let unauthorized = openai_failure(StatusCode::UNAUTHORIZED);
        let rate_limited = openai_failure(StatusCode::TOO_MANY_REQUESTS);
        let bad_request = openai_failure(StatusCode::BAD_REQUEST);

        // Assert
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert!(unauthorized.to_string().starts_with("Invalid OpenAI API key"));
        assert_eq!(rate_limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            bad_request.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            bad_request.to_string(),
            "OpenAI API error: 400 - {\"error\":\"nope\"}"
        );
    }
}
