//! Answer normalization.
//!
//! Model output is free-form text ("b", " C.\n", "Answer: D"). Stored
//! expected answers are usually clean letters but may carry stray
//! punctuation too. Both sides go through [`normalize_answer`] before they
//! are compared, so formatting noise never turns into a false mismatch.

use super::letter::AnswerLetter;

/// Extract the first `A`/`B`/`C`/`D` (case-insensitive) from `raw`.
///
/// Returns `None` for `None`, empty input, or input containing none of the
/// four letters. Normalizing the string form of a returned letter yields the
/// same letter.
pub fn normalize_answer(raw: Option<&str>) -> Option<AnswerLetter> {
    raw?.chars()
        .find_map(|c| AnswerLetter::from_char(c.to_ascii_uppercase()))
}

/// Convenience wrapper for non-optional input
pub fn normalize_str(raw: &str) -> Option<AnswerLetter> {
    normalize_answer(Some(raw))
}
