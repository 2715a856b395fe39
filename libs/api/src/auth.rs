use axum::{
    extract::{Request, State},
    http::{self, Method},
    middleware::Next,
    response::Response,
};

use crate::{ApiError, ApiState};

/// Checks the caller key when one is configured. Accepts either the
/// `apikey` header or `Authorization: Bearer <key>`.
pub async fn auth(
    State(state): State<ApiState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(accept_api_key) = state.accept_api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let authorized = {
        let headers = req.headers();
        let api_key = headers
            .get("apikey")
            .and_then(|header| header.to_str().ok());
        let bearer = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        match api_key.or(bearer) {
            Some(presented) => keys_match(presented, accept_api_key),
            None => {
                return Err(ApiError::AuthError(
                    "Authorization header is missing".to_string(),
                ));
            }
        }
    };

    if authorized {
        return Ok(next.run(req).await);
    }

    Err(ApiError::AuthError("Invalid API key".to_string()))
}

/// Compares every byte so the time taken does not depend on where the keys
/// first differ.
fn keys_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }

    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
