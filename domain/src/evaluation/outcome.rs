//! Per-attempt evaluation outcome

use crate::answer::letter::AnswerLetter;
use crate::core::domain::Domain;
use crate::core::question::QuestionId;
use serde::{Deserialize, Serialize};

/// What happened to one question during a pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Valid letter extracted and persisted
    Answered { answer: AnswerLetter },
    /// The model replied but no letter could be extracted; left unanswered
    Unparseable { raw: String },
    /// All attempts failed, or the answer could not be persisted
    Failed { error: String },
}

/// Result of evaluating a single question (ephemeral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub domain: Domain,
    pub question_id: QuestionId,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Latency of the successful attempt; absent when every attempt failed
    pub latency_ms: Option<f64>,
}

impl EvaluationOutcome {
    pub fn answered(
        domain: Domain,
        question_id: QuestionId,
        answer: AnswerLetter,
        latency_ms: f64,
    ) -> Self {
        Self {
            domain,
            question_id,
            status: OutcomeStatus::Answered { answer },
            latency_ms: Some(latency_ms),
        }
    }

    pub fn unparseable(
        domain: Domain,
        question_id: QuestionId,
        raw: impl Into<String>,
        latency_ms: f64,
    ) -> Self {
        Self {
            domain,
            question_id,
            status: OutcomeStatus::Unparseable { raw: raw.into() },
            latency_ms: Some(latency_ms),
        }
    }

    pub fn failed(
        domain: Domain,
        question_id: QuestionId,
        error: impl Into<String>,
        latency_ms: Option<f64>,
    ) -> Self {
        Self {
            domain,
            question_id,
            status: OutcomeStatus::Failed {
                error: error.into(),
            },
            latency_ms,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.status, OutcomeStatus::Answered { .. })
    }

    /// The persisted letter, if any
    pub fn answer(&self) -> Option<AnswerLetter> {
        match self.status {
            OutcomeStatus::Answered { answer } => Some(answer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_accessors() {
        let outcome =
            EvaluationOutcome::answered(Domain::History, QuestionId::new(1), AnswerLetter::C, 42.0);
        assert!(outcome.is_answered());
        assert_eq!(outcome.answer(), Some(AnswerLetter::C));
        assert_eq!(outcome.latency_ms, Some(42.0));
    }

    #[test]
    fn test_failed_has_no_answer() {
        let outcome =
            EvaluationOutcome::failed(Domain::History, QuestionId::new(2), "timeout", None);
        assert!(!outcome.is_answered());
        assert_eq!(outcome.answer(), None);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let outcome = EvaluationOutcome::unparseable(
            Domain::ComputerSecurity,
            QuestionId::new(3),
            "E",
            10.0,
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["domain"], "Computer_Security");
        assert_eq!(json["question_id"], 3);
        assert_eq!(json["status"], "unparseable");
        assert_eq!(json["raw"], "E");
    }
}
