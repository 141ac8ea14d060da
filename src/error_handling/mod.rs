//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error enums for each pipeline stage boundary
//! - Processing statistics tracking (errors, warnings, info metrics)
//!
//! Stage failures are classified as:
//! - **Fatal**: `FetchError`, `ParseError` (the URL yields no result)
//! - **Non-fatal**: `EnrichmentError`, `CacheError`, persistence `StoreError`
//!   (the result is returned, degraded, and a warning is counted)

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    AnalysisError, CacheError, EnrichmentError, ErrorType, ExportError, FetchError, InfoType,
    InitializationError, ParseError, StoreError, WarningType,
};
