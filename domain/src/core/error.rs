//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown domain: {0} (expected one of History, Social_Science, Computer_Security)")]
    UnknownDomain(String),

    #[error("Invalid answer letter: {0:?}")]
    InvalidLetter(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}
