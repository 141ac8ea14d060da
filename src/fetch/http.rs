//! HTTP fetcher built on `reqwest`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::Url;
use tokio_retry::RetryIf;

use super::retry::{get_retry_strategy, is_retriable_error};
use super::types::PageDocument;
use super::Fetcher;
use crate::config::{Config, MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE, RETRY_MAX_ATTEMPTS};
use crate::error_handling::{FetchError, InitializationError};
use crate::initialization::init_redirect_client;

/// Fetches pages with a redirect-disabled client, following `Location`
/// headers itself so hops can be counted and bounded.
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
    max_retries: usize,
    max_body_size: usize,
}

impl HttpFetcher {
    /// Wraps an existing client. The client must not follow redirects itself.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            max_retries: RETRY_MAX_ATTEMPTS,
            max_body_size: MAX_RESPONSE_BODY_SIZE,
        }
    }

    /// Builds a fetcher with a client configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::new(init_redirect_client(config)?))
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the largest accepted body, in bytes.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    async fn fetch_once(
        &self,
        url: &Url,
        follow_redirects: bool,
        timeout: Duration,
    ) -> Result<PageDocument, FetchError> {
        let start = Instant::now();
        let mut current = url.clone();
        let mut redirect_count = 0;

        let response = loop {
            let response = self
                .client
                .get(current.clone())
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(current.as_str(), &e))?;

            let status = response.status();
            if !(follow_redirects && status.is_redirection()) {
                break response;
            }
            let Some(location) = response.headers().get(LOCATION) else {
                warn!(
                    "Redirect status {} for {} but no Location header",
                    status.as_u16(),
                    current
                );
                break response;
            };
            if redirect_count >= MAX_REDIRECT_HOPS {
                return Err(FetchError::Redirect {
                    url: url.to_string(),
                    reason: format!("exceeded {MAX_REDIRECT_HOPS} redirect hops"),
                });
            }

            let next = location
                .to_str()
                .ok()
                .and_then(|loc| current.join(loc).ok())
                .ok_or_else(|| FetchError::Redirect {
                    url: current.to_string(),
                    reason: "invalid Location header".to_string(),
                })?;
            debug!("Redirect {} -> {} ({})", current, next, status.as_u16());
            current = next;
            redirect_count += 1;
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: current.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let declared_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(size) = declared_size.filter(|size| *size > self.max_body_size) {
            return Err(FetchError::BodyTooLarge {
                url: current.to_string(),
                size,
            });
        }

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        // Content-Length may be absent; the cap also holds per chunk
        let mut response = response;
        let mut bytes: Vec<u8> = Vec::with_capacity(declared_size.unwrap_or(0));
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(current.as_str(), &e))?
        {
            if bytes.len() + chunk.len() > self.max_body_size {
                return Err(FetchError::BodyTooLarge {
                    url: current.to_string(),
                    size: bytes.len() + chunk.len(),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        let body = decode_body(&bytes, headers.get(CONTENT_TYPE.as_str()).map(String::as_str));

        Ok(PageDocument {
            body,
            base_url: url.to_string(),
            final_url: current.to_string(),
            status_code: status.as_u16(),
            headers,
            elapsed: start.elapsed(),
            redirect_count,
        })
    }
}

/// Decodes `bytes` with the charset named in `content_type`, defaulting to UTF-8.
/// Invalid sequences become U+FFFD.
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(|ct| {
            ct.split(';')
                .filter_map(|param| param.trim().split_once('='))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
                .map(|(_, value)| value.trim().trim_matches('"'))
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        follow_redirects: bool,
        timeout: Duration,
    ) -> Result<PageDocument, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        RetryIf::start(
            get_retry_strategy(self.max_retries),
            || self.fetch_once(&parsed, follow_redirects, timeout),
            |e: &FetchError| {
                let retriable = is_retriable_error(e);
                if retriable {
                    debug!("Retrying {url} after transient failure: {e}");
                }
                retriable
            },
        )
        .await
    }
}
