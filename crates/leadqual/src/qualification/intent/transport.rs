use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;

/// Failure raised by a completion backend. The classifier treats every
/// variant uniformly: log, back off, retry.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("completion endpoint returned status {0}")]
    Status(u16),
    #[error("malformed completion payload: {0}")]
    Payload(String),
    #[error("completion transport disabled")]
    Disabled,
}

/// Single "generate text from a prompt" call against a remote model.
///
/// Object-safe so tests can substitute scripted fakes; the per-call timeout
/// lives in the classifier's retry policy, not in implementations.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, TransportError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Production transport speaking the OpenAI-style chat-completions wire
/// format over HTTP.
pub struct HttpCompletionTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpCompletionTransport {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl CompletionTransport for HttpCompletionTransport {
    async fn complete(&self, prompt: &str) -> Result<String, TransportError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| TransportError::Payload(err.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| TransportError::Payload("response carried no choices".to_string()))
    }
}

/// Transport used when AI scoring is switched off entirely; any call is a
/// wiring bug, so it fails loudly rather than fabricating text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTransport;

#[async_trait]
impl CompletionTransport for DisabledTransport {
    async fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
        Err(TransportError::Disabled)
    }
}
