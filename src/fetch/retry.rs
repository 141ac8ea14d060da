//! Retry strategy and error retriability.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{
    HTTP_STATUS_TOO_MANY_REQUESTS, RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_SECS,
};
use crate::error_handling::FetchError;

/// Returns the backoff delays between attempts, at most `max_retries` of them.
pub fn get_retry_strategy(max_retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_INITIAL_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(max_retries)
}

/// Determines if a fetch failure is transient and worth retrying.
///
/// Timeouts, connection failures, generic transport errors, 429, and 5xx
/// responses are retried. Invalid URLs, other 4xx responses, redirect
/// problems, and oversized bodies are permanent.
pub fn is_retriable_error(error: &FetchError) -> bool {
    match error {
        FetchError::Timeout { .. } | FetchError::Connect { .. } | FetchError::Request { .. } => {
            true
        }
        FetchError::Status { status, .. } => {
            *status == HTTP_STATUS_TOO_MANY_REQUESTS || (500..600).contains(status)
        }
        FetchError::InvalidUrl { .. }
        | FetchError::Redirect { .. }
        | FetchError::BodyTooLarge { .. } => false,
    }
}
