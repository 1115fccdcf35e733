//! Prompt domain
//!
//! Fixed templates for asking a model one multiple-choice question.

mod template;

pub use template::PromptTemplate;
