//! Page fetching.
//!
//! The pipeline depends only on the [`Fetcher`] trait. [`HttpFetcher`] is the
//! production implementation: it walks redirect chains manually, caps the body
//! size, and retries transient failures with exponential backoff.

mod http;
mod retry;
mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::FetchError;

pub use http::HttpFetcher;
pub use retry::{get_retry_strategy, is_retriable_error};
pub use types::PageDocument;

/// Retrieves a page over the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`.
    ///
    /// When `follow_redirects` is false a 3xx response is returned as the
    /// document instead of being followed. `timeout` bounds each request.
    async fn fetch(
        &self,
        url: &str,
        follow_redirects: bool,
        timeout: Duration,
    ) -> Result<PageDocument, FetchError>;
}
