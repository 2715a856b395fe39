use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use util::load_config;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub use crate::config::Config;
use crate::response::ApiResponse;

mod analyze;
mod auth;
pub mod config;
mod connectivity;
mod generate;
pub mod healthz;
pub mod job;
pub mod not_found;
mod response;
mod suggest;
#[cfg(test)]
mod test_util;

pub use response::ErrorEnvelope;

pub const JOB_PATH: &str = "/generate-ad-image";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    ClientError(String),
    #[error("{0}")]
    AuthError(String),
    #[error("{0}")]
    QuotaExhaustedError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    RateLimitError(String),
    #[error("{0}")]
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    gateway: Option<gateway::models::Models>,
    config: Arc<Config>,
    accept_api_key: Option<Arc<str>>,
}

impl ApiState {
    pub fn new(
        config: Config,
        gateway_api_key: Option<&str>,
        accept_api_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let gateway = gateway_api_key
            .map(|token| {
                gateway::models::Models::new(
                    &config.gateway.base_url,
                    token,
                    config.gateway.timeout(),
                )
            })
            .transpose()
            .context("failed to build gateway client")?;

        Ok(Self {
            gateway,
            config: Arc::new(config),
            accept_api_key: accept_api_key.map(Arc::from),
        })
    }

    fn gateway(&self) -> ApiResponse<&gateway::models::Models> {
        self.gateway.as_ref().ok_or_else(|| {
            ApiError::ServerError(
                "GATEWAY_API_KEY is not configured".to_string(),
            )
        })
    }

    fn external(&self, api_key: &str) -> ApiResponse<openai::models::Models> {
        openai::models::Models::new(
            &self.config.openai.base_url,
            api_key,
            self.config.openai.timeout(),
        )
        .map_err(|e| ApiError::ClientError(format!("Invalid API key: {}", e)))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(job::generate_ad_image, healthz::get_health),
    components(schemas(
        job::request::GenerationRequest,
        job::request::ProviderSettings,
        job::request::Provider,
        job::response::JobResponse,
        job::response::CreativeSuggestion,
        job::response::ImageVariation,
        ErrorEnvelope
    )),
    tags(
        (name = "adforge", description = "Ad copy suggestions, analysis and image generation")
    )
)]
struct ApiDoc;

pub fn serve(
    config_name: &str,
    gateway_api_key: Option<String>,
    accept_api_key: Option<String>,
) -> anyhow::Result<Router> {
    info!(task = "start api serving", config = config_name);

    let table = load_config(config_name)?;
    let config = Config::from_table(&table)?;

    if gateway_api_key.is_none() {
        info!(task = "gateway key missing, only external generation works");
    }

    let state =
        ApiState::new(config, gateway_api_key.as_deref(), accept_api_key)?;

    Ok(router(state))
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    let job_router = Router::new()
        .route(
            JOB_PATH,
            post(job::generate_ad_image).options(job::preflight),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::auth))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .with_state(state);

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .route("/healthz", get(healthz::get_health))
        .merge(job_router)
        .fallback(not_found::get_404)
        .layer(cors)
}
