//! String utilities for the domain layer.

/// Shorten `s` to at most `max_len` bytes, ending with `...` when cut.
///
/// Cuts only on UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Collapse runs of whitespace (including newlines) into single spaces.
///
/// Used before printing question text or provider error bodies on one line.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte_boundary() {
        // 'é' is 2 bytes; cutting inside it must back up
        assert_eq!(truncate("ééééé", 8), "éé...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  Which\n  period\tcame first? "), "Which period came first?");
        assert_eq!(single_line(""), "");
    }
}
