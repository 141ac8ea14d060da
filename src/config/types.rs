//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and library configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_CACHE_TTL_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_MAX_LINKS, DEFAULT_USER_AGENT,
};
use crate::export::ExportFormat;
use crate::pipeline::AnalysisSettings;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which key-value backend holds cached analyses.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendKind {
    /// Process-local map (lost on exit)
    Memory,
    /// `cache_entries` table in the analysis database
    Sqlite,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used to build an
/// [`Analyzer`](crate::Analyzer). It can be constructed programmatically.
///
/// # Examples
///
/// ```no_run
/// use web_analyzer::Config;
///
/// let config = Config {
///     max_concurrency: 4,
///     cache_ttl_secs: 600,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Maximum concurrent analyses in a batch
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Lifetime of cached analyses in seconds
    pub cache_ttl_secs: u64,

    /// Cache backend selection
    pub cache_backend: CacheBackendKind,

    /// Language model API key; `None` disables enrichment
    pub llm_api_key: Option<String>,

    /// Language model chat completions endpoint
    pub llm_endpoint: String,

    /// Language model name
    pub llm_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_backend: CacheBackendKind::Sqlite,
            llm_api_key: None,
            llm_endpoint: crate::config::DEFAULT_LLM_ENDPOINT.to_string(),
            llm_model: crate::config::DEFAULT_LLM_MODEL.to_string(),
        }
    }
}

/// Command-line options for the `web_analyzer` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "web_analyzer",
    about = "Fetches web pages and produces scored SEO analyses",
    version
)]
pub struct Opt {
    /// URLs to analyze
    pub urls: Vec<String>,

    /// File to read URLs from (one per line, `#` comments allowed)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Maximum concurrent analyses
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Lifetime of cached analyses in seconds
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Cache backend
    #[arg(long, value_enum, default_value = "sqlite")]
    pub cache_backend: CacheBackendKind,

    /// Skip AI enrichment even when an API key is configured
    #[arg(long)]
    pub no_ai: bool,

    /// Skip SEO scoring
    #[arg(long)]
    pub no_seo: bool,

    /// Do not follow HTTP redirects
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Maximum number of link records returned per page
    #[arg(long, default_value_t = DEFAULT_MAX_LINKS)]
    pub max_links: usize,

    /// Maximum number of characters of page text returned
    #[arg(long, default_value_t = DEFAULT_MAX_CONTENT_LENGTH)]
    pub max_content_length: usize,

    /// Export each successful analysis in this format
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Opt {
    /// Builds the library configuration, taking the API key from the environment.
    pub fn to_config(&self, llm_api_key: Option<String>) -> Config {
        Config {
            db_path: self.db_path.clone(),
            max_concurrency: self.max_concurrency.max(1),
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent.clone(),
            cache_ttl_secs: self.cache_ttl,
            cache_backend: self.cache_backend.clone(),
            llm_api_key: if self.no_ai { None } else { llm_api_key },
            ..Default::default()
        }
    }

    /// Builds per-request analysis settings from the CLI flags.
    pub fn to_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            include_ai_analysis: !self.no_ai,
            include_seo_analysis: !self.no_seo,
            follow_redirects: !self.no_follow_redirects,
            max_links: self.max_links,
            max_content_length: self.max_content_length,
            ..Default::default()
        }
    }
}
