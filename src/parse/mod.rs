//! HTML parsing and data extraction.
//!
//! This module turns a fetched body plus its base URL into structured signals:
//! - Metadata (title, meta tags, canonical URL, language, OpenGraph, Twitter)
//! - Link inventory (internal/external classification)
//! - Image inventory (alt-text coverage)
//! - Heading outline
//! - Visible text
//! - Performance facts from the fetch
//!
//! All parsing is done using CSS selectors via the `scraper` crate. Extractors
//! never fail on malformed markup; only an unparseable base URL is an error.

mod content;
mod headings;
mod images;
mod links;
mod metadata;
mod performance;
mod types;

use scraper::Html;
use url::Url;

use crate::error_handling::ParseError;

// Re-export public API
pub use content::extract_content;
pub use headings::extract_headings;
pub use images::extract_images;
pub use links::extract_links;
pub use metadata::{extract_metadata, extract_title};
pub use performance::extract_performance;
pub use types::{
    Content, ExtractionResult, Heading, Headings, Image, ImageInventory, Link, LinkInventory,
    Metadata, Performance,
};

/// A parsed document together with the URL its relative references resolve against.
///
/// `scraper::Html` is not `Send`, so a `ParsedPage` must be dropped before the
/// next `.await` in async code.
pub struct ParsedPage {
    /// Parsed DOM.
    pub document: Html,
    /// Base URL for link and image resolution.
    pub base: Url,
}

/// Parses `body` and validates `base_url`.
///
/// # Errors
///
/// Returns `ParseError::InvalidBaseUrl` if `base_url` is not an absolute URL.
pub fn parse_document(body: &str, base_url: &str) -> Result<ParsedPage, ParseError> {
    let base = Url::parse(base_url).map_err(|e| ParseError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    let document = Html::parse_document(body);
    log::debug!(
        "Parsed {} bytes from {} ({} parser errors)",
        body.len(),
        base,
        document.errors.len()
    );
    Ok(ParsedPage { document, base })
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
