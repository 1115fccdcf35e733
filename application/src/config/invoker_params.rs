//! Invoker parameters: request shape and retry policy.
//!
//! [`InvokerParams`] is passed explicitly into
//! [`ModelInvoker`](crate::use_cases::invoke_model::ModelInvoker) at
//! construction. There is no process-wide client or retry setting.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model request and retry parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokerParams {
    /// Provider model identifier.
    pub model: String,
    /// Sampling temperature; kept low for deterministic answers.
    pub temperature: f32,
    /// Output token cap; a single letter needs very few.
    pub max_tokens: u32,
    /// Maximum attempts per question (values below 1 act as 1).
    pub retries: u32,
    /// Sleep before the second attempt; doubles after each failure.
    pub backoff_base: Duration,
    /// Per-attempt deadline, on top of any provider-side timeout.
    pub attempt_timeout: Option<Duration>,
}

impl Default for InvokerParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            max_tokens: 5,
            retries: 3,
            backoff_base: Duration::from_secs(1),
            attempt_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl InvokerParams {
    /// Effective attempt count
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }

    /// Sleep between attempt `attempt` and `attempt + 1` (0-indexed): `base * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}
