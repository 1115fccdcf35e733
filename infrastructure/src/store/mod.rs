//! Question store adapters

pub mod sqlite;

pub use sqlite::SqliteQuestionStore;
