//! Domain layer for quizbench
//!
//! This crate contains the core evaluation logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Questions and Domains
//!
//! A [`Question`] is a four-option multiple-choice item belonging to one
//! [`Domain`]. The store owns questions; an evaluation pass only records the
//! model's answer and latency on them.
//!
//! ## Normalized Answers
//!
//! [`normalize_answer`] reduces free-form text to an [`AnswerLetter`] (or no
//! match). Both the stored expected answer and the model output are
//! normalized before comparison.
//!
//! ## Summaries
//!
//! [`ResultsSummary::aggregate`] computes accuracy and mean latency per domain
//! and overall, and picks the best and slowest domain.

pub mod answer;
pub mod config;
pub mod core;
pub mod evaluation;
pub mod prompt;

// Re-export commonly used types
pub use answer::{
    letter::AnswerLetter,
    normalizer::{normalize_answer, normalize_str},
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    domain::Domain,
    error::DomainError,
    question::{AnsweredRecord, NewQuestion, Question, QuestionId, RecordedAnswer, answers_match},
};
pub use evaluation::{
    event::ProgressEvent,
    outcome::{EvaluationOutcome, OutcomeStatus},
    summary::{DomainSummary, OverallSummary, ResultsSummary},
};
pub use prompt::PromptTemplate;
