//! Character-aware string helpers.
//!
//! Lengths throughout the pipeline are counted in Unicode scalar values, never
//! bytes, so multi-byte text is never split mid-character.

/// Returns the number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Returns the first `max` characters of `s`, borrowing when nothing is cut.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
