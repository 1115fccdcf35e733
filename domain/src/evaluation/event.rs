//! Live progress events emitted during an evaluation pass.
//!
//! Events are tagged by `kind` so a transport can relay them verbatim, e.g.
//! `{"kind":"question_ok","domain":"History","question_id":4,"latency_ms":812.3,"answer":"B"}`.

use crate::answer::letter::AnswerLetter;
use crate::core::domain::Domain;
use crate::core::question::QuestionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Processing of a domain is starting
    Started { domain: Domain },
    /// The domain has no unanswered questions
    NoWork { domain: Domain },
    /// A valid answer was recorded
    QuestionOk {
        domain: Domain,
        question_id: QuestionId,
        latency_ms: f64,
        answer: AnswerLetter,
    },
    /// The model could not be reached, or the answer could not be saved
    QuestionFailed {
        domain: Domain,
        question_id: QuestionId,
        error: String,
    },
    /// The model replied without a usable letter; the question stays unanswered
    InvalidAnswer {
        domain: Domain,
        question_id: QuestionId,
        raw: String,
    },
    /// Unanswered questions could not be listed; the domain was skipped
    DomainFailed { domain: Domain, error: String },
    /// The pass finished
    Completed { total_processed: usize },
    /// The pass was stopped early
    Cancelled { total_processed: usize },
}

impl ProgressEvent {
    /// Tag value used on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Started { .. } => "started",
            ProgressEvent::NoWork { .. } => "no_work",
            ProgressEvent::QuestionOk { .. } => "question_ok",
            ProgressEvent::QuestionFailed { .. } => "question_failed",
            ProgressEvent::InvalidAnswer { .. } => "invalid_answer",
            ProgressEvent::DomainFailed { .. } => "domain_failed",
            ProgressEvent::Completed { .. } => "completed",
            ProgressEvent::Cancelled { .. } => "cancelled",
        }
    }

    /// Domain the event refers to, if any
    pub fn domain(&self) -> Option<Domain> {
        match self {
            ProgressEvent::Started { domain }
            | ProgressEvent::NoWork { domain }
            | ProgressEvent::QuestionOk { domain, .. }
            | ProgressEvent::QuestionFailed { domain, .. }
            | ProgressEvent::InvalidAnswer { domain, .. }
            | ProgressEvent::DomainFailed { domain, .. } => Some(*domain),
            ProgressEvent::Completed { .. } | ProgressEvent::Cancelled { .. } => None,
        }
    }

    /// Whether this event ends a pass
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Completed { .. } | ProgressEvent::Cancelled { .. }
        )
    }
}
