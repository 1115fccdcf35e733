//! Question entity and its store-facing projections
//!
//! Questions are owned by the question store. The evaluation pipeline reads
//! them and records model answers against them, but never creates them;
//! [`NewQuestion`] exists only for dataset import.

use super::domain::Domain;
use super::error::DomainError;
use crate::answer::letter::AnswerLetter;
use crate::answer::normalizer::normalize_answer;
use serde::{Deserialize, Serialize};

/// Store-assigned question identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A multiple-choice question together with its recorded outcome (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub domain: Domain,
    pub prompt_text: String,
    /// Option texts in A..D order
    pub options: [String; 4],
    pub expected_answer: String,
    pub model_response: Option<String>,
    pub response_time_ms: Option<f64>,
    pub is_answered: bool,
}

impl Question {
    /// Text of the option labelled `letter`
    pub fn option(&self, letter: AnswerLetter) -> &str {
        &self.options[letter.index()]
    }

    /// Whether the recorded response matches the expected answer.
    ///
    /// Derived on demand, never stored. `None` until the question is
    /// answered; `Some(false)` when either side fails to normalize.
    pub fn is_correct(&self) -> Option<bool> {
        if !self.is_answered {
            return None;
        }
        Some(answers_match(
            Some(self.expected_answer.as_str()),
            self.model_response.as_deref(),
        ))
    }
}

/// Reference data for a question that does not exist in the store yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub prompt_text: String,
    pub options: [String; 4],
    pub expected_answer: String,
}

impl NewQuestion {
    /// Create new reference data, rejecting a blank prompt.
    pub fn try_new(
        prompt_text: impl Into<String>,
        options: [String; 4],
        expected_answer: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let prompt_text = prompt_text.into();
        if prompt_text.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question text cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            prompt_text,
            options,
            expected_answer: expected_answer.into(),
        })
    }
}

/// Partial update written when a question receives a valid answer.
///
/// Applying it always sets `is_answered = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub model_response: AnswerLetter,
    pub response_time_ms: f64,
}

impl RecordedAnswer {
    pub fn new(model_response: AnswerLetter, response_time_ms: f64) -> Self {
        Self {
            model_response,
            response_time_ms,
        }
    }
}

/// Projection of an answered question used for aggregation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnsweredRecord {
    pub expected_answer: Option<String>,
    pub model_response: Option<String>,
    pub response_time_ms: Option<f64>,
}

impl AnsweredRecord {
    pub fn new(
        expected_answer: impl Into<String>,
        model_response: impl Into<String>,
        response_time_ms: Option<f64>,
    ) -> Self {
        Self {
            expected_answer: Some(expected_answer.into()),
            model_response: Some(model_response.into()),
            response_time_ms,
        }
    }

    pub fn is_correct(&self) -> bool {
        answers_match(
            self.expected_answer.as_deref(),
            self.model_response.as_deref(),
        )
    }

    /// Latency usable for averaging (finite values only)
    pub fn latency(&self) -> Option<f64> {
        self.response_time_ms.filter(|ms| ms.is_finite())
    }
}

/// True only when both sides normalize to the same valid letter
pub fn answers_match(expected: Option<&str>, got: Option<&str>) -> bool {
    match (normalize_answer(expected), normalize_answer(got)) {
        (Some(expected), Some(got)) => expected == got,
        _ => false,
    }
}
