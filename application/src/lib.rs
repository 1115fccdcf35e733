//! Application layer for quizbench
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::InvokerParams;
pub use ports::{
    completion_provider::{CompletionProvider, CompletionRequest, ProviderError},
    composite_progress::CompositePublisher,
    progress::{NoProgress, ProgressPublisher},
    question_source::{QuestionSource, SourceError},
    question_store::{AnswerFilter, QuestionStore, StoreError},
};
pub use use_cases::import_questions::{ImportQuestionsUseCase, ImportReport, ImportStatus};
pub use use_cases::invoke_model::{InvokeError, Invocation, ModelInvoker};
pub use use_cases::run_evaluation::{EvaluationReport, RunEvaluationInput, RunEvaluationUseCase};
pub use use_cases::summarize_results::{SummarizeError, SummarizeResultsUseCase};
