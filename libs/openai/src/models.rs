use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Body, Client, RequestBuilder,
};
use tracing::debug;

use crate::response::{IntoResponse, Response};
use crate::OpenAiError;

pub mod image_generation;
pub mod list_models;

/// One client per caller key; the key travels in the default headers.
#[derive(Debug, Clone)]
pub struct Models {
    base_url: String,
    client: Client,
}

impl Models {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let mut headers = HeaderMap::new();
        let mut authorization =
            HeaderValue::from_str(format!("Bearer {}", api_key).as_str())
                .into_response("api key is not a valid header")?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_response("failed to build provider client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_string(&self, path: &str) -> Response<String> {
        let request = self.client.get(self.url(path));
        Self::string_response(request).await
    }

    async fn post_string<R: Into<Body>>(
        &self,
        request: R,
        path: &str,
    ) -> Response<String> {
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(request);
        Self::string_response(request).await
    }

    async fn string_response(request: RequestBuilder) -> Response<String> {
        let response = request
            .send()
            .await
            .into_response("failed to send provider request")?;

        let status_code = response.status();
        debug!(task = "provider response", status = status_code.as_u16());

        let text = response
            .text()
            .await
            .into_response("failed to read provider response")?;

        if !status_code.is_success() {
            return Err(OpenAiError::FailedStatusCode {
                status_code,
                message: text,
            });
        }

        Ok(text)
    }
}
