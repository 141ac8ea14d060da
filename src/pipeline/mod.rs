//! Analysis pipeline.
//!
//! This module provides:
//! - [`AnalysisSettings`]: stage toggles and limits, part of the cache fingerprint
//! - [`AnalysisRecord`]: the assembled result of one run
//! - [`Analyzer`]: the orchestrator sequencing fetch, extraction, scoring,
//!   enrichment, caching, and persistence
//!
//! Fetch and parse failures are fatal for a run. Everything after extraction
//! degrades: a failed stage becomes a warning on the [`AnalysisOutcome`].

mod orchestrator;
mod record;
mod settings;

pub use orchestrator::{AnalysisOutcome, Analyzer};
pub use record::{AnalysisRecord, RecordStats};
pub use settings::AnalysisSettings;
