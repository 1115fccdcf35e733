//! Evaluation results and live progress.
//!
//! - [`outcome::EvaluationOutcome`]: what happened to one question in a pass
//! - [`summary::ResultsSummary`]: per-domain and overall accuracy/latency
//! - [`event::ProgressEvent`]: tagged events published while a pass runs

pub mod event;
pub mod outcome;
pub mod summary;
