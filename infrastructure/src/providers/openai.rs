//! OpenAI-compatible chat completions adapter.
//!
//! Sends one non-streaming `POST {base_url}/v1/chat/completions` per call and
//! returns the first choice's content. Retrying is left to the invoker.

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use quizbench_application::ports::completion_provider::{
    CompletionProvider, CompletionRequest, ProviderError,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Response bodies longer than this are cut in error messages
const MAX_ERROR_BODY: usize = 500;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiCompletionProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiCompletionProvider {
    /// Create a provider for `base_url` (without the `/v1/...` suffix)
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: Self::endpoint_for(base_url),
            api_key: api_key.into(),
        })
    }

    /// Build from the `[provider]` section, resolving the API key
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            ProviderError::Other(format!(
                "no API key: set provider.api_key or ${}",
                config.api_key_env
            ))
        })?;
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(&config.base_url, api_key, timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn endpoint_for(base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{}/v1/chat/completions", base)
    }

    fn map_send_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Connection(e.to_string())
        }
    }

    fn map_status(status: StatusCode, body: &str) -> ProviderError {
        let body = if body.chars().count() > MAX_ERROR_BODY {
            let cut: String = body.chars().take(MAX_ERROR_BODY).collect();
            format!("{}...", cut)
        } else {
            body.to_string()
        };
        ProviderError::Status {
            status: status.as_u16(),
            body,
        }
    }

    /// Extract the first choice's text, rejecting missing or blank content
    fn parse_response(body: &str) -> Result<String, ProviderError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::Decode(format!("invalid JSON: {}", e)))?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(url = %self.endpoint, model = %request.model, "Sending chat completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let text = response.text().await.map_err(Self::map_send_error)?;

        if !status.is_success() {
            return Err(Self::map_status(status, &text));
        }
        Self::parse_response(&text)
    }
}
