use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::LlmError;
use crate::models::{ChatModel, Role};

/// Generations can legitimately take minutes, so only connection setup
/// is bounded; reads are not.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// One conversation turn as the completion endpoint sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion backend. The pipeline talks to this trait so tests
/// can script responses without a network.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &ChatModel,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Deserialize)]
struct CompletionChoiceMessage {
    content: String,
}

/// Client for an OpenAI-compatible /v1/chat/completions endpoint.
pub struct ChatClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &ChatModel,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.api_url);
        let request = CompletionRequest {
            model: model.as_str(),
            messages,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.api_url.clone())
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::ResponseParsing("no choices in response".to_string()))
    }
}

/// Everything one scripted completion call received, for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub model: ChatModel,
    pub temperature: f32,
}

/// Scripted stand-in for `ChatClient`. Responses are consumed in order;
/// every call is recorded.
#[derive(Default)]
pub struct MockChatClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, content: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(content.to_string()));
        self
    }

    pub fn fail_with(self, error: LlmError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for MockChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &ChatModel,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            model: model.clone(),
            temperature,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Http("no scripted response left".to_string())))
    }
}
