//! Core domain concepts shared across all subdomains.
//!
//! - [`domain::Domain`]: the fixed question categories
//! - [`question::Question`]: a multiple-choice question and its recorded outcome
//! - [`error::DomainError`]: domain-level errors

pub mod domain;
pub mod error;
pub mod question;
pub mod string;
