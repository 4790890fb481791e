use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::GenerationError;

/// Sampling temperature used for curriculum generation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// A hosted text-generation model.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Send `prompt` as a single user message and return the raw text reply.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the model is not configured, the
    /// request fails, or the reply is empty.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: Option<AiConfig>,
}

impl ChatCompletionClient {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: Option<AiConfig>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.config.as_ref().map(|c| c.model.as_str())
    }
}

#[async_trait]
impl TextModel for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let config = self
            .config
            .as_ref()
            .ok_or(GenerationError::NotConfigured)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: GENERATION_TEMPERATURE,
        };

        debug!(model = %config.model, prompt_chars = prompt.len(), "sending chat completion");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
