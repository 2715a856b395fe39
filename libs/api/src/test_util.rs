use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use gateway::{
    models::chat_completion::{
        ChatCompletion, ChatCompletionRequest, ChatCompletionResponse,
    },
    GatewayError,
};
use openai::{
    models::image_generation::{
        ImageGeneration, ImageGenerationRequest, ImageGenerationResponse,
    },
    OpenAiError,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{router, ApiState, Config};

const CONFIG: &str = include_str!("../../../Config.toml");

pub(crate) fn test_config() -> Config {
    Config::parse(CONFIG).unwrap()
}

pub(crate) fn text_json(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

pub(crate) fn tool_call_json(name: &str, arguments: Value) -> Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_0",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments.to_string() }
                }]
            }
        }]
    })
}

pub(crate) fn image_json(url: &str) -> Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "Here is your ad.",
                "images": [{ "type": "image_url", "image_url": { "url": url } }]
            }
        }]
    })
}

pub(crate) fn text_response(content: &str) -> ChatCompletionResponse {
    serde_json::from_value(text_json(content)).unwrap()
}

pub(crate) fn tool_call_response(
    name: &str,
    arguments: Value,
) -> ChatCompletionResponse {
    serde_json::from_value(tool_call_json(name, arguments)).unwrap()
}

pub(crate) fn image_response(url: &str) -> ChatCompletionResponse {
    serde_json::from_value(image_json(url)).unwrap()
}

/// In-memory gateway answering from a script and recording requests.
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<ChatCompletionResponse, GatewayError>>>,
    requests: Mutex<Vec<Value>>,
}

impl ScriptedGateway {
    pub(crate) fn new(
        replies: Vec<Result<ChatCompletionResponse, GatewayError>>,
    ) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(vec![]),
        }
    }

    pub(crate) fn failure(status_code: StatusCode) -> GatewayError {
        GatewayError::FailedStatusCode {
            status_code,
            message: "scripted failure".to_string(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatCompletion for ScriptedGateway {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(&request).unwrap());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left")
    }
}

/// In-memory image provider answering one scripted batch.
pub(crate) struct ScriptedImages {
    reply: Mutex<Option<Result<ImageGenerationResponse, OpenAiError>>>,
    requests: Mutex<Vec<Value>>,
}

impl ScriptedImages {
    pub(crate) fn new(data: Value) -> Self {
        let response = serde_json::from_value(json!({ "data": data })).unwrap();
        Self::scripted(Ok(response))
    }

    pub(crate) fn failure(status_code: StatusCode, body: &str) -> Self {
        Self::scripted(Err(OpenAiError::FailedStatusCode {
            status_code,
            message: body.to_string(),
        }))
    }

    fn scripted(reply: Result<ImageGenerationResponse, OpenAiError>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            requests: Mutex::new(vec![]),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl ImageGeneration for ScriptedImages {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, OpenAiError> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(&request).unwrap());
        self.reply
            .lock()
            .unwrap()
            .take()
            .expect("no scripted reply left")
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    replies: HashMap<String, VecDeque<(StatusCode, Value)>>,
    requests: HashMap<String, Vec<Recorded>>,
}

/// HTTP stand-in for both upstream providers.
#[derive(Clone, Default)]
pub(crate) struct MockUpstream {
    inner: Arc<Mutex<MockState>>,
}

impl MockUpstream {
    pub(crate) fn reply(
        &self,
        path: &str,
        status_code: StatusCode,
        body: Value,
    ) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .entry(path.to_string())
            .or_default()
            .push_back((status_code, body));
        self
    }

    pub(crate) fn requests(&self, path: &str) -> Vec<Recorded> {
        self.inner
            .lock()
            .unwrap()
            .requests
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) async fn start(&self) -> String {
        let app = Router::new()
            .route("/models", get(record))
            .route("/images/generations", post(record))
            .route("/chat/completions", post(record))
            .layer(DefaultBodyLimit::disable())
            .with_state(self.clone());

        format!("http://{}", spawn(app).await)
    }
}

async fn record(
    State(mock): State<MockUpstream>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let recorded = Recorded {
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };

    let mut state = mock.inner.lock().unwrap();
    state
        .requests
        .entry(uri.path().to_string())
        .or_default()
        .push(recorded);

    let (status_code, body) = state
        .replies
        .get_mut(uri.path())
        .and_then(VecDeque::pop_front)
        .unwrap_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "unscripted request" }),
        ));

    (status_code, Json(body))
}

pub(crate) async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    address
}

/// Serves the real router against `upstream` and returns its base url.
pub(crate) async fn spawn_app(
    upstream: &str,
    gateway_api_key: Option<&str>,
    accept_api_key: Option<&str>,
) -> String {
    spawn_configured(test_config(), upstream, gateway_api_key, accept_api_key)
        .await
}

pub(crate) async fn spawn_configured(
    mut config: Config,
    upstream: &str,
    gateway_api_key: Option<&str>,
    accept_api_key: Option<&str>,
) -> String {
    config.gateway.base_url = upstream.to_string();
    config.openai.base_url = upstream.to_string();

    let state = ApiState::new(
        config,
        gateway_api_key,
        accept_api_key.map(str::to_string),
    )
    .unwrap();

    format!("http://{}", spawn(router(state)).await)
}
