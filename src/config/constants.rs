//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, extraction limits, and cache defaults.

use std::time::Duration;

/// Default maximum number of concurrent analyses in a batch.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Per-URL processing timeout.
///
/// Covers fetch (with retries), extraction, enrichment, cache write, and persistence.
/// Formula: HTTP timeout (10s) x 3 attempts + backoff (~6s) + LLM call (~20s) + buffer.
pub const URL_PROCESSING_TIMEOUT: Duration = Duration::from_secs(90);

/// Default SQLite database path for stored analyses.
pub const DB_PATH: &str = "./web_analyzer.db";

// Network operation timeouts
/// Per-request HTTP timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
/// Timeout for the language model request in seconds
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum response body size in bytes (2MB)
/// Larger bodies fail the fetch instead of being parsed
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

// Redirect handling
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 2;

/// HTTP 429 status code
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

// Extraction limits
/// Link display text is truncated to this many characters
pub const LINK_TEXT_MAX_CHARS: usize = 100;
/// Maximum number of image records returned per page
pub const MAX_IMAGES: usize = 100;
/// Default cap on the number of returned link records
pub const DEFAULT_MAX_LINKS: usize = 50;
/// Default cap on returned page text, in characters
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 5000;

// Cache
/// Namespace prefix for analysis cache keys
pub const CACHE_KEY_PREFIX: &str = "analysis:";
/// Default cache entry lifetime in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// Extra lifetime given to backend-native expiry past the entry TTL, so expired
/// entries are still visible to the store and get deleted on read
pub const CACHE_BACKEND_GRACE: Duration = Duration::from_secs(60);

// Language model
/// Content preview length sent to the language model, in characters
pub const AI_CONTENT_PREVIEW_CHARS: usize = 2000;
/// Default chat completion model
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
/// Default chat completions endpoint
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Maximum tokens requested from the language model
pub const LLM_MAX_TOKENS: u32 = 1000;
/// Sampling temperature for the language model
pub const LLM_TEMPERATURE: f32 = 0.3;
/// Environment variable holding the language model API key
pub const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";

// Logging
/// Maximum error message length in characters stored on batch results
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;
