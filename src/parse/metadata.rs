//! Metadata extraction: title, meta tags, canonical URL, language, OpenGraph,
//! and Twitter cards.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::types::Metadata;
use crate::utils::parse_selector_unsafe;

const DEFAULT_LANGUAGE: &str = "en";
const OPEN_GRAPH_PREFIX: &str = "og:";
const TWITTER_PREFIX: &str = "twitter:";

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("title", "TITLE_SELECTOR"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("meta", "META_SELECTOR"));
static CANONICAL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("link[rel~='canonical']", "CANONICAL_SELECTOR"));
static HTML_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("html", "HTML_SELECTOR"));

/// Extracts page metadata.
///
/// When `include_meta_tags` is false the generic `meta_tags` map stays empty;
/// every other field is still collected.
pub fn extract_metadata(document: &Html, include_meta_tags: bool) -> Metadata {
    let mut metadata = Metadata {
        title: extract_title(document),
        canonical_url: extract_canonical(document),
        language: extract_language(document),
        ..Default::default()
    };

    for element in document.select(&META_SELECTOR) {
        let meta = element.value();

        if metadata.charset.is_none() {
            if let Some(charset) = meta.attr("charset").map(str::trim) {
                if !charset.is_empty() {
                    metadata.charset = Some(charset.to_string());
                }
            }
        }

        let content = meta.attr("content").unwrap_or("").trim();
        let non_empty = |attr: &str| meta.attr(attr).map(str::trim).filter(|v| !v.is_empty());
        let name = non_empty("name");
        let property = non_empty("property");

        let Some(key) = name.or(property).or_else(|| non_empty("http-equiv")) else {
            continue;
        };
        let key = key.to_lowercase();

        if key == "description" && name.is_some() && metadata.description.is_none() {
            metadata.description = Some(content.to_string());
        }

        if include_meta_tags {
            metadata
                .meta_tags
                .entry(key)
                .or_insert_with(|| content.to_string());
        }

        if let Some(og_key) = property.and_then(|p| p.strip_prefix(OPEN_GRAPH_PREFIX)) {
            metadata
                .open_graph
                .entry(og_key.to_string())
                .or_insert_with(|| content.to_string());
        }

        if let Some(name) = name {
            let lowered = name.to_lowercase();
            if let Some(card_key) = lowered.strip_prefix(TWITTER_PREFIX) {
                metadata
                    .twitter
                    .entry(card_key.to_string())
                    .or_insert_with(|| content.to_string());
            }
        }
    }

    log::debug!(
        "Extracted metadata: title={:?}, {} meta tags, {} og, {} twitter",
        metadata.title,
        metadata.meta_tags.len(),
        metadata.open_graph.len(),
        metadata.twitter.len()
    );

    metadata
}

/// Returns the trimmed text of the first `<title>`, or an empty string.
pub fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_canonical(document: &Html) -> Option<String> {
    document
        .select(&CANONICAL_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string)
}

fn extract_language(document: &Html) -> String {
    let from_html = document
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("lang"));
    let lang = from_html.or_else(|| document.root_element().value().attr("lang"));

    match lang.map(str::trim) {
        Some(lang) if !lang.is_empty() => lang.to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}
