//! String utilities for the domain layer.

/// Take at most `n` characters from the start of `s` (UTF-8 safe).
///
/// Counts Unicode scalar values, not bytes, so multibyte statements are
/// never split inside a character.
pub fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Shorten `s` to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept = first_chars(s, max_chars.saturating_sub(3));
    format!("{}...", kept)
}
