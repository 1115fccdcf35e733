//! Completion provider port
//!
//! Defines the interface for asking a model provider for one chat completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during a completion call
///
/// Every variant is treated as transient by the invoker: the call is retried
/// with backoff until attempts run out.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Provider returned empty content")]
    EmptyResponse,

    #[error("Other error: {0}")]
    Other(String),
}

/// A fixed-shape chat completion request (system + user message)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Provider for single-shot chat completions
///
/// Implementations (adapters) live in the infrastructure layer. They return
/// the raw text of the first choice and do no retrying of their own.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
