//! Fetched page representation.

use std::collections::BTreeMap;
use std::time::Duration;

/// A fetched page, consumed once per pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    /// Raw HTML body.
    pub body: String,
    /// URL that was requested; relative references resolve against it.
    pub base_url: String,
    /// URL of the final response after redirects.
    pub final_url: String,
    /// HTTP status of the final response.
    pub status_code: u16,
    /// Response headers with lower-cased names.
    pub headers: BTreeMap<String, String>,
    /// Wall-clock time from the first request to the full body.
    pub elapsed: Duration,
    /// Number of redirects followed.
    pub redirect_count: usize,
}

impl PageDocument {
    /// Builds a 200 `text/html` document for `url` with no redirects.
    pub fn from_html(url: &str, body: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "text/html; charset=utf-8".to_string());
        Self {
            body: body.to_string(),
            base_url: url.to_string(),
            final_url: url.to_string(),
            status_code: 200,
            headers,
            elapsed: Duration::ZERO,
            redirect_count: 0,
        }
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
