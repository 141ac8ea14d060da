//! web_analyzer library: page analysis with SEO scoring and a fingerprint cache
//!
//! This library fetches web pages, extracts structured signals (metadata,
//! links, images, headings, visible text), scores them against SEO rules,
//! optionally asks a language model for narrative insight, and caches and
//! persists the assembled record.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use web_analyzer::{run_batch, AnalysisSettings, Analyzer, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     max_concurrency: 4,
//!     ..Default::default()
//! };
//! let analyzer = Arc::new(Analyzer::from_config(&config).await?);
//!
//! let report = run_batch(
//!     analyzer,
//!     vec!["https://example.com".to_string()],
//!     AnalysisSettings::default(),
//!     config.max_concurrency,
//! )
//! .await;
//! println!("{} of {} succeeded", report.successful, report.total);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod app;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
pub mod parse;
pub mod pipeline;
pub mod run;
pub mod seo;
pub mod storage;
mod utils;

// Re-export public API
pub use cache::{derive_cache_key, CacheStore};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{AnalysisError, ProcessingStats};
pub use export::{ExportFormat, Exporter, FileExporter};
pub use pipeline::{AnalysisOutcome, AnalysisRecord, AnalysisSettings, Analyzer};
pub use run::{run_batch, BatchItem, BatchReport};
pub use seo::{score_page, Grade, SeoReport};
