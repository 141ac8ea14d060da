//! Error type definitions.
//!
//! This module defines the error enums returned at each pipeline stage boundary
//! and the error, warning, and info categories tracked by `ProcessingStats`.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::export::ExportFormat;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening the database or running migrations.
    #[error("Database initialization error: {0}")]
    DatabaseError(#[from] StoreError),
}

/// Failure to retrieve a page. Always fatal for the URL being analyzed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// The request did not complete within the timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// A connection could not be established.
    #[error("Failed to connect to {url}: {reason}")]
    Connect {
        /// Requested URL
        url: String,
        /// Underlying error message
        reason: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} ({reason}) from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        reason: String,
    },

    /// The redirect chain exceeded the hop limit or had an unusable `Location`.
    #[error("Redirect error for {url}: {reason}")]
    Redirect {
        /// Requested URL
        url: String,
        /// What went wrong
        reason: String,
    },

    /// The body exceeded `MAX_RESPONSE_BODY_SIZE`.
    #[error("Response body from {url} too large ({size} bytes)")]
    BodyTooLarge {
        /// Requested URL
        url: String,
        /// Body size in bytes
        size: usize,
    },

    /// Any other transport failure.
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying error message
        reason: String,
    },
}

impl FetchError {
    /// Classifies a `reqwest::Error` raised while requesting `url`.
    pub fn from_reqwest(url: &str, error: &ReqwestError) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect {
                url,
                reason: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
        } else if error.is_redirect() {
            FetchError::Redirect {
                url,
                reason: error.to_string(),
            }
        } else {
            FetchError::Request {
                url,
                reason: error.to_string(),
            }
        }
    }

    /// Returns the statistics category for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::InvalidUrl { .. } => ErrorType::InvalidUrl,
            FetchError::Timeout { .. } => ErrorType::HttpRequestTimeoutError,
            FetchError::Connect { .. } => ErrorType::HttpRequestConnectError,
            FetchError::Status { status, .. } => match status {
                403 => ErrorType::HttpRequestBotDetectionError,
                404 => ErrorType::HttpRequestNotFound,
                429 => ErrorType::HttpRequestTooManyRequests,
                500..=599 => ErrorType::HttpRequestServerError,
                _ => ErrorType::HttpRequestStatusError,
            },
            FetchError::Redirect { .. } => ErrorType::HttpRequestRedirectError,
            FetchError::BodyTooLarge { .. } => ErrorType::HttpRequestBodyError,
            FetchError::Request { .. } => ErrorType::HttpRequestOtherError,
        }
    }
}

/// Failure to turn a fetched body into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Links and images cannot be resolved without a valid base URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Offending URL
        url: String,
        /// Parser message
        reason: String,
    },
}

/// Fatal outcome of a single pipeline run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The whole run exceeded `URL_PROCESSING_TIMEOUT`.
    #[error("Analysis of {url} timed out after {seconds} seconds")]
    Timeout {
        /// Requested URL
        url: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The task running the analysis panicked or was cancelled.
    #[error("Analysis task aborted: {0}")]
    Aborted(String),
}

impl AnalysisError {
    /// Returns the statistics category for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            AnalysisError::Fetch(e) => e.error_type(),
            AnalysisError::Parse(_) => ErrorType::DocumentParseError,
            AnalysisError::Timeout { .. } => ErrorType::ProcessUrlTimeout,
            AnalysisError::Aborted(_) => ErrorType::TaskAborted,
        }
    }
}

/// Failure of the language model collaborator. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    /// No API key or client was configured.
    #[error("AI analysis not configured")]
    NotConfigured,

    /// The request could not be sent or timed out.
    #[error("AI analysis failed: {0}")]
    Request(String),

    /// The provider answered with an error status.
    #[error("AI analysis failed: provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// The provider answered with an unexpected payload shape.
    #[error("AI analysis failed: unexpected response: {0}")]
    InvalidResponse(String),
}

/// Failure of the cache backend. Never fatal; the cache degrades to a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend I/O failure.
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Entry could not be encoded or decoded.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQL execution error in the SQLite backend.
    #[error("Cache SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Errors from the analysis record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given identifier.
    #[error("Analysis {0} not found")]
    NotFound(i64),

    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Stored payload could not be encoded or decoded.
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from exporting a stored analysis.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The format has no renderer in this crate.
    #[error("Export format '{0}' is not supported")]
    UnsupportedFormat(ExportFormat),

    /// Writing the output file failed.
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed.
    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Types of errors that can occur during URL processing.
///
/// This enum categorizes fatal failures - conditions that stop a URL from
/// producing an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    /// Request timed out
    HttpRequestTimeoutError,
    /// Connection failed
    HttpRequestConnectError,
    /// Non-2xx status not covered below
    HttpRequestStatusError,
    /// Redirect chain too long or broken
    HttpRequestRedirectError,
    /// Body too large or unreadable
    HttpRequestBodyError,
    /// Any other transport failure
    HttpRequestOtherError,
    /// 429 Too Many Requests
    HttpRequestTooManyRequests,
    /// 403 Forbidden, typically bot detection
    HttpRequestBotDetectionError,
    /// 404 Not Found
    HttpRequestNotFound,
    /// 5xx
    HttpRequestServerError,
    /// URL could not be parsed
    InvalidUrl,
    // Document errors
    /// Base URL rejected by the parser
    DocumentParseError,
    // Run-level errors
    /// Whole run exceeded `URL_PROCESSING_TIMEOUT`
    ProcessUrlTimeout,
    /// Task panicked or was cancelled
    TaskAborted,
}

/// Types of warnings that can occur during URL processing.
///
/// Warnings indicate degraded output that doesn't prevent a result from
/// being returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// Page has no `<title>`
    MissingTitle,
    /// Page has no meta description
    MissingMetaDescription,
    /// Language model call failed
    EnrichmentFailed,
    /// Store rejected the record
    PersistFailed,
    /// Cache lookup failed or returned an undecodable entry
    CacheReadFailed,
    /// Cache write failed
    CacheWriteFailed,
}

/// Types of informational metrics that can occur during URL processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// Served from cache
    CacheHit,
    /// No cache entry
    CacheMiss,
    /// Cache entry past its TTL
    CacheExpired,
    /// At least one redirect followed
    HttpRedirect,
    /// Enrichment requested but no client enabled
    EnrichmentSkipped,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestStatusError => "HTTP request status error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests",
            ErrorType::HttpRequestBotDetectionError => "Bot detection (403 Forbidden)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::InvalidUrl => "Invalid URL",
            ErrorType::DocumentParseError => "Document parse error",
            ErrorType::ProcessUrlTimeout => "Process URL timeout",
            ErrorType::TaskAborted => "Task aborted",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MissingTitle => "Missing title",
            WarningType::MissingMetaDescription => "Missing meta description",
            WarningType::EnrichmentFailed => "AI enrichment failed",
            WarningType::PersistFailed => "Failed to persist analysis",
            WarningType::CacheReadFailed => "Cache read failed",
            WarningType::CacheWriteFailed => "Cache write failed",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::CacheHit => "Cache hit",
            InfoType::CacheMiss => "Cache miss",
            InfoType::CacheExpired => "Cache entry expired",
            InfoType::HttpRedirect => "HTTP redirect",
            InfoType::EnrichmentSkipped => "AI enrichment skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_type_as_str() {
        assert_eq!(
            ErrorType::HttpRequestTimeoutError.as_str(),
            "HTTP request timeout error"
        );
        assert_eq!(
            ErrorType::HttpRequestBotDetectionError.as_str(),
            "Bot detection (403 Forbidden)"
        );
        assert_eq!(ErrorType::HttpRequestNotFound.as_str(), "Not Found (404)");
    }

    #[test]
    fn test_all_types_have_string_representation() {
        for error_type in ErrorType::iter() {
            assert!(!error_type.as_str().is_empty(), "{:?}", error_type);
        }
        for warning_type in WarningType::iter() {
            assert!(!warning_type.as_str().is_empty(), "{:?}", warning_type);
        }
        for info_type in InfoType::iter() {
            assert!(!info_type.as_str().is_empty(), "{:?}", info_type);
        }
    }

    #[test]
    fn test_fetch_status_categorization() {
        let status = |code: u16| FetchError::Status {
            url: "https://example.com".to_string(),
            status: code,
            reason: String::new(),
        };
        assert_eq!(
            status(403).error_type(),
            ErrorType::HttpRequestBotDetectionError
        );
        assert_eq!(status(404).error_type(), ErrorType::HttpRequestNotFound);
        assert_eq!(
            status(429).error_type(),
            ErrorType::HttpRequestTooManyRequests
        );
        assert_eq!(status(503).error_type(), ErrorType::HttpRequestServerError);
        assert_eq!(status(410).error_type(), ErrorType::HttpRequestStatusError);
    }

    #[test]
    fn test_analysis_error_delegates_to_fetch_category() {
        let err = AnalysisError::from(FetchError::Timeout {
            url: "https://example.com".to_string(),
        });
        assert_eq!(err.error_type(), ErrorType::HttpRequestTimeoutError);
        assert_eq!(err.to_string(), "Request to https://example.com timed out");
    }

    #[test]
    fn test_analysis_error_run_level_categories() {
        let timeout = AnalysisError::Timeout {
            url: "https://example.com".to_string(),
            seconds: 60,
        };
        assert_eq!(timeout.error_type(), ErrorType::ProcessUrlTimeout);
        assert_eq!(
            AnalysisError::Aborted("panic".to_string()).error_type(),
            ErrorType::TaskAborted
        );
        let parse = AnalysisError::from(ParseError::InvalidBaseUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        assert_eq!(parse.error_type(), ErrorType::DocumentParseError);
    }

    #[test]
    fn test_enrichment_error_messages() {
        assert_eq!(
            EnrichmentError::NotConfigured.to_string(),
            "AI analysis not configured"
        );
        assert!(EnrichmentError::Request("boom".to_string())
            .to_string()
            .starts_with("AI analysis failed"));
    }
}
