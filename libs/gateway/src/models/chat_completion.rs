pub mod implementation;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::GatewayError;

static CHAT_COMPLETIONS: &str = "chat/completions";

pub trait ChatCompletion {
    fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> impl std::future::Future<
        Output = Result<ChatCompletionResponse, GatewayError>,
    > + Send;
}

#[derive(Debug, Serialize, Default)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<Modality>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: Content,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(content.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: Content::Parts(parts),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    Function { function: FunctionDefinition },
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Forces the model to answer through one named function.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    Function { function: FunctionName },
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function {
            function: FunctionName { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionName {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Text,
}

////////////////////////////// Response //////////////////////////////
#[derive(Debug, Deserialize, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// Choices are read leniently: a filtered choice may carry no message and
/// an image entry may carry no url.
#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResponseMessage {
    pub content: Option<ResponseContent>,
    pub tool_calls: Option<Vec<ToolCall>>,
    pub images: Option<Vec<GeneratedImage>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponseContent {
    Text(String),
    Parts(Vec<Value>),
}

impl ResponseContent {
    /// Text parts joined in order; non-text parts are dropped.
    pub fn text(&self) -> String {
        match self {
            ResponseContent::Text(text) => text.clone(),
            ResponseContent::Parts(parts) => parts
                .iter()
                .filter(|part| part["type"] == "text")
                .filter_map(|part| part["text"].as_str())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub image_url: Option<GeneratedImageUrl>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImageUrl {
    #[serde(default)]
    pub url: Option<String>,
}

impl ChatCompletionResponse {
    fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    pub fn content(&self) -> Option<String> {
        self.first_message()?.content.as_ref().map(ResponseContent::text)
    }

    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.first_message()?.tool_calls.as_ref()?.first()
    }

    pub fn first_image_url(&self) -> Option<&str> {
        let image = self.first_message()?.images.as_ref()?.first()?;
        image
            .image_url
            .as_ref()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}
