//! HTTP client initialization.
//!
//! Page fetching uses a client with redirects disabled so the fetcher can walk
//! the redirect chain itself and count hops.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, LLM_REQUEST_TIMEOUT_SECS};

/// Initializes a shared HTTP client for redirect resolution.
///
/// Creates a `reqwest::Client` with redirects disabled so the fetcher can
/// manually follow `Location` headers, enforce `MAX_REDIRECT_HOPS`, and
/// honor a per-request `follow_redirects = false`.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_redirect_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the client used for chat-completion requests.
///
/// Language model calls are slower than page fetches, so this client uses
/// `LLM_REQUEST_TIMEOUT_SECS` rather than the page timeout.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_llm_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(LLM_REQUEST_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
