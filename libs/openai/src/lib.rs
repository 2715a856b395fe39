//! Client for an external, caller-keyed image provider speaking the OpenAI
//! REST API.

mod error;
pub mod models;
mod response;

pub use error::OpenAiError;
