//! Multiple-choice answers.
//!
//! - [`letter::AnswerLetter`]: one of the four option letters
//! - [`normalizer::normalize_answer`]: extracts a letter from free-form text

pub mod letter;
pub mod normalizer;
