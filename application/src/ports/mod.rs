//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod completion_provider;
pub mod composite_progress;
pub mod progress;
pub mod question_source;
pub mod question_store;
