//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod import_questions;
pub mod invoke_model;
pub mod run_evaluation;
pub(crate) mod shared;
pub mod summarize_results;
