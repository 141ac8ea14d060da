//! Utilities for sanitizing error messages.
//!
//! Provider error bodies and transport messages end up in logs, batch results,
//! and enrichment error markers, so control characters are stripped and the
//! length is bounded.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;
use crate::utils::text::{char_len, truncate_chars};

/// Removes control characters except newline, tab, and carriage return.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Sanitizes `message` and truncates it to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncated messages end with a marker carrying the original length.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let original_len = char_len(&sanitized);

    if original_len > MAX_ERROR_MESSAGE_LENGTH {
        let keep = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        format!(
            "{}... (truncated, original length: {} chars)",
            truncate_chars(&sanitized, keep),
            original_len
        )
    } else {
        sanitized
    }
}
