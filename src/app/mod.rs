//! Main application helpers.
//!
//! This module provides URL validation and input loading, and statistics
//! printing used by the binary.

pub mod statistics;
pub mod url;

// Re-export public API
pub use statistics::{print_batch_summary, print_error_statistics};
pub use url::{read_urls, validate_and_normalize_url};
