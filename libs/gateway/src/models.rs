use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Body, Client,
};
use tracing::debug;

use crate::response::{IntoResponse, Response};
use crate::GatewayError;

pub mod chat_completion;

#[derive(Debug, Clone)]
pub struct Models {
    base_url: String,
    client: Client,
}

impl Models {
    pub fn new(
        base_url: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let mut authorization =
            HeaderValue::from_str(format!("Bearer {}", token).as_str())
                .into_response("gateway token is not a valid header")?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_response("failed to build gateway client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn string_response<R: Into<Body>>(
        &self,
        request: R,
        path: &str,
    ) -> Response<String> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(task = "gateway request", url = url.as_str());

        let response = self
            .client
            .post(url)
            .body(request)
            .send()
            .await
            .into_response("failed to send gateway request")?;

        let status_code = response.status();
        let text = response
            .text()
            .await
            .into_response("failed to read gateway response")?;

        if !status_code.is_success() {
            return Err(GatewayError::FailedStatusCode {
                status_code,
                message: text,
            });
        }

        Ok(text)
    }
}
