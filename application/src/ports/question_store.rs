//! Question store port
//!
//! Defines the persistence contract the evaluation pipeline relies on.
//! Uniqueness of question text and required fields are the store's own
//! invariants; the pipeline assumes them and never re-checks them.

use async_trait::async_trait;
use quizbench_domain::{AnsweredRecord, Domain, NewQuestion, Question, QuestionId, RecordedAnswer};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Question {id} not found in {domain}")]
    NotFound { domain: Domain, id: QuestionId },

    #[error("Duplicate question in {domain}: {text}")]
    Duplicate { domain: Domain, text: String },

    #[error("Store error: {0}")]
    Other(String),
}

/// Which questions a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerFilter {
    #[default]
    All,
    Answered,
    Unanswered,
}

impl AnswerFilter {
    /// Whether a question with the given answered flag passes the filter
    pub fn matches(&self, is_answered: bool) -> bool {
        match self {
            AnswerFilter::All => true,
            AnswerFilter::Answered => is_answered,
            AnswerFilter::Unanswered => !is_answered,
        }
    }
}

/// Per-domain question persistence
///
/// Every write is scoped to a single question id and must be atomic on its
/// own, so a pass interrupted at any point leaves earlier answers intact.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// List a domain's questions in the store's natural order
    async fn list(
        &self,
        domain: Domain,
        filter: AnswerFilter,
    ) -> Result<Vec<Question>, StoreError>;

    /// Project answered questions down to the fields aggregation needs
    async fn list_answered(&self, domain: Domain) -> Result<Vec<AnsweredRecord>, StoreError>;

    /// Apply a recorded answer to one question and return the updated row
    async fn record_answer(
        &self,
        domain: Domain,
        id: QuestionId,
        answer: &RecordedAnswer,
    ) -> Result<Question, StoreError>;

    /// Number of questions stored for a domain
    async fn count(&self, domain: Domain) -> Result<usize, StoreError>;

    /// Insert reference questions, returning how many were stored
    async fn insert_many(
        &self,
        domain: Domain,
        questions: Vec<NewQuestion>,
    ) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches() {
        assert!(AnswerFilter::All.matches(true));
        assert!(AnswerFilter::All.matches(false));
        assert!(AnswerFilter::Answered.matches(true));
        assert!(!AnswerFilter::Answered.matches(false));
        assert!(AnswerFilter::Unanswered.matches(false));
        assert!(!AnswerFilter::Unanswered.matches(true));
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound {
            domain: Domain::History,
            id: QuestionId::new(9),
        };
        assert_eq!(err.to_string(), "Question 9 not found in History");
    }
}
