use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway responded with {}: {}", status_code, message)]
    FailedStatusCode {
        status_code: StatusCode,
        message: String,
    },

    #[error("in reqwest crate: {}: {}", message, source)]
    ReqwestError {
        message: String,
        source: reqwest::Error,
    },

    #[error("in serde_json crate: {}: {}", message, source)]
    SerdeJsonError {
        message: String,
        source: serde_json::Error,
    },

    #[error("invalid header value: {}: {}", message, source)]
    InvalidHeader {
        message: String,
        source: reqwest::header::InvalidHeaderValue,
    },
}

impl GatewayError {
    /// Upstream status, when the gateway answered at all.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            GatewayError::FailedStatusCode { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }
}
