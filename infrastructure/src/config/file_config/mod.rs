//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod dataset;
mod evaluation;
mod logging;
mod output;
mod providers;
mod store;

pub use dataset::FileDatasetConfig;
pub use evaluation::FileEvaluationConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use providers::FileProviderConfig;
pub use store::FileStoreConfig;

use quizbench_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Completion endpoint and credentials
    pub provider: FileProviderConfig,
    /// Model parameters, retry policy, domain selection
    pub evaluation: FileEvaluationConfig,
    /// Question database
    pub store: FileStoreConfig,
    /// Reference CSV files
    pub dataset: FileDatasetConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks evaluation parameters and domain names, the provider timeout,
    /// and whether an API key can be resolved.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.evaluation.validate();

        if self.provider.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "provider.timeout_secs".to_string(),
                    value: "0".to_string(),
                },
                "provider.timeout_secs must be at least 1",
            ));
        }

        if self.provider.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "provider.base_url".to_string(),
                },
                "provider.base_url must not be empty",
            ));
        }

        if self.provider.resolve_api_key().is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey {
                    env_var: self.provider.api_key_env.clone(),
                },
                format!(
                    "no API key found: set provider.api_key or ${}",
                    self.provider.api_key_env
                ),
            ));
        }

        issues
    }

    /// Timeout applied to each model attempt
    pub fn attempt_timeout(&self) -> Option<Duration> {
        (self.provider.timeout_secs > 0).then(|| Duration::from_secs(self.provider.timeout_secs))
    }
}
