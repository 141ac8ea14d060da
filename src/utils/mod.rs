//! Utility functions shared across pipeline stages.
//!
//! This module provides:
//! - CSS selector parsing for static selectors
//! - Character-aware truncation
//! - Error message sanitization

pub mod sanitize;
mod selector;
mod text;

pub use sanitize::sanitize_and_truncate_error_message;
pub use selector::parse_selector_unsafe;
pub use text::{char_len, truncate_chars};
