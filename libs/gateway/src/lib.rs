//! Client for the managed, OpenAI-compatible chat completion gateway.
//!
//! The gateway serves plain text completions, forced function calls and
//! image output through the same `chat/completions` endpoint.

mod error;
pub mod models;
mod response;

pub use error::GatewayError;
