//! Question source port
//!
//! Supplies reference questions for the one-time dataset import.

use async_trait::async_trait;
use quizbench_domain::{Domain, NewQuestion};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read dataset {path}: {message}")]
    Read { path: String, message: String },

    #[error("Malformed row {row} in {path}: {message}")]
    Malformed {
        path: String,
        row: usize,
        message: String,
    },
}

/// Loader for a domain's reference questions
///
/// A missing dataset is not an error: implementations return an empty list
/// and the import treats the domain as having nothing to insert.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn load(&self, domain: Domain) -> Result<Vec<NewQuestion>, SourceError>;
}
