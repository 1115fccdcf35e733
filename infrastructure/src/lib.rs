//! Infrastructure layer for quizbench
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod dataset;
pub mod events;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use dataset::CsvQuestionSource;
pub use events::{BroadcastPublisher, relay};
pub use logging::JsonlEventLog;
pub use providers::OpenAiCompletionProvider;
pub use store::SqliteQuestionStore;
