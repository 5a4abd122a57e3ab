pub mod client;

pub use client::{ChatClient, ChatCompletion, ChatMessage, MockChatClient};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("cannot reach the completion endpoint at {0}")]
    Connection(String),
    #[error("completion endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("HTTP client error: {0}")]
    Http(String),
    #[error("cannot parse completion response: {0}")]
    ResponseParsing(String),
}
