//! Evaluation configuration from TOML (`[evaluation]` section)

use quizbench_application::InvokerParams;
use quizbench_domain::{ConfigIssue, ConfigIssueCode, Domain};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model request shape, retry policy and domain selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEvaluationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Total attempts per question
    pub retries: u32,
    /// Delay before the second attempt; doubles on every further attempt
    pub backoff_ms: u64,
    /// Domains processed by `run` when none are given (empty = all)
    pub domains: Vec<String>,
}

impl Default for FileEvaluationConfig {
    fn default() -> Self {
        let params = InvokerParams::default();
        Self {
            model: params.model,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            retries: params.retries,
            backoff_ms: params.backoff_base.as_millis() as u64,
            domains: Vec::new(),
        }
    }
}

impl FileEvaluationConfig {
    /// Build invoker parameters; `attempt_timeout` comes from `[provider]`.
    pub fn to_invoker_params(&self, attempt_timeout: Option<Duration>) -> InvokerParams {
        InvokerParams::default()
            .with_model(self.model.trim())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_retries(self.retries)
            .with_backoff_base(Duration::from_millis(self.backoff_ms))
            .with_attempt_timeout(attempt_timeout)
    }

    /// Parse configured domains, skipping unknown names.
    ///
    /// An empty list (or one with no valid names) selects every domain.
    pub fn parse_domains(&self) -> (Vec<Domain>, Vec<ConfigIssue>) {
        let mut domains = Vec::new();
        let mut issues = Vec::new();

        for raw in &self.domains {
            match raw.parse::<Domain>() {
                Ok(domain) if !domains.contains(&domain) => domains.push(domain),
                Ok(_) => {}
                Err(_) => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownDomain { value: raw.clone() },
                    format!("evaluation.domains: unknown domain '{}', ignoring", raw),
                )),
            }
        }

        if domains.is_empty() {
            domains = Domain::ALL.to_vec();
        }
        (domains, issues)
    }

    pub(crate) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_domains().1;

        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "evaluation.model".to_string(),
                },
                "evaluation.model must not be empty",
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "evaluation.temperature".to_string(),
                    value: self.temperature.to_string(),
                },
                format!(
                    "evaluation.temperature must be between 0 and 2, got {}",
                    self.temperature
                ),
            ));
        }

        if self.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "evaluation.max_tokens".to_string(),
                    value: "0".to_string(),
                },
                "evaluation.max_tokens must be at least 1",
            ));
        }

        if self.retries == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "evaluation.retries".to_string(),
                    value: "0".to_string(),
                },
                "evaluation.retries is 0, using a single attempt",
            ));
        }

        issues
    }
}
