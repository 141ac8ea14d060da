//! Heading outline extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::types::{Heading, Headings};
use crate::utils::parse_selector_unsafe;

static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("h1, h2, h3, h4, h5, h6", "HEADING_SELECTOR"));

/// Collects `h1` through `h6` in document order, grouped by level.
pub fn extract_headings(document: &Html) -> Headings {
    let mut headings = Headings::default();

    for element in document.select(&HEADING_SELECTOR) {
        let level = element
            .value()
            .name()
            .strip_prefix('h')
            .and_then(|n| n.parse::<u8>().ok());
        let Some(bucket) = level.and_then(|level| headings.level_mut(level)) else {
            continue;
        };
        bucket.push(Heading {
            text: element.text().collect::<String>().trim().to_string(),
            id: element.value().id().map(str::to_string),
        });
    }

    headings
}
