//! Extraction result types.
//!
//! Every field has a typed default so missing or malformed markup degrades to
//! empty values instead of errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Trimmed text of the first `<title>`, empty when absent.
    pub title: String,
    /// Content of `meta[name=description]`, collected even when `meta_tags` is skipped.
    pub description: Option<String>,
    /// Every `meta` tag keyed by lower-cased `name`, `property`, or `http-equiv`.
    pub meta_tags: BTreeMap<String, String>,
    /// `href` of `link[rel=canonical]`.
    pub canonical_url: Option<String>,
    /// Document language, `"en"` when unspecified.
    pub language: String,
    /// `meta[charset]` value.
    pub charset: Option<String>,
    /// OpenGraph properties without the `og:` prefix.
    pub open_graph: BTreeMap<String, String>,
    /// Twitter card entries without the `twitter:` prefix, keys lower-cased.
    pub twitter: BTreeMap<String, String>,
}

/// A single anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    /// Visible text, at most `LINK_TEXT_MAX_CHARS` characters.
    pub text: String,
    /// Raw `href` attribute.
    pub href: String,
    /// `href` resolved against the base URL, `None` when it cannot be resolved.
    pub url: Option<String>,
    /// `title` attribute.
    pub title: Option<String>,
    /// Whitespace-split `rel` attribute.
    pub rel: Vec<String>,
    /// `target` attribute.
    pub target: Option<String>,
    /// Whether the resolved host equals the base host.
    pub internal: bool,
}

/// Link inventory with capped sequences and un-capped totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkInventory {
    /// First `max_links` links in document order.
    pub all: Vec<Link>,
    /// First `max_links / 2` internal links.
    pub internal: Vec<Link>,
    /// First `max_links / 2` external links.
    pub external: Vec<Link>,
    /// Count of all links before capping.
    pub total: usize,
    /// Count of internal links before capping.
    pub total_internal: usize,
    /// Count of external links before capping.
    pub total_external: usize,
}

/// A single image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Raw `src` attribute.
    pub src: String,
    /// `src` resolved against the base URL.
    pub url: Option<String>,
    /// `alt` attribute, empty when missing.
    pub alt: String,
    /// `title` attribute.
    pub title: Option<String>,
    /// `width` attribute as written.
    pub width: Option<String>,
    /// `height` attribute as written.
    pub height: Option<String>,
    /// `loading` attribute, `"eager"` when absent.
    pub loading: String,
}

/// Image inventory with a capped sequence and un-capped totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInventory {
    /// First `MAX_IMAGES` images in document order.
    pub images: Vec<Image>,
    /// Count of images with a non-empty `src`.
    pub total: usize,
    /// Images with non-empty `alt`.
    pub with_alt: usize,
    /// Images with missing or empty `alt`.
    pub without_alt: usize,
}

/// A heading element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heading {
    /// Trimmed text content.
    pub text: String,
    /// `id` attribute.
    pub id: Option<String>,
}

/// Heading outline. Every level is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Headings {
    pub h1: Vec<Heading>,
    pub h2: Vec<Heading>,
    pub h3: Vec<Heading>,
    pub h4: Vec<Heading>,
    pub h5: Vec<Heading>,
    pub h6: Vec<Heading>,
}

impl Headings {
    /// Returns the headings of `level` (1-6); other levels are empty.
    pub fn level(&self, level: u8) -> &[Heading] {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            6 => &self.h6,
            _ => &[],
        }
    }

    pub(crate) fn level_mut(&mut self, level: u8) -> Option<&mut Vec<Heading>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }
}

/// Visible page text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Cleaned text truncated to `max_content_length` characters.
    pub text: String,
    /// Character count of the full cleaned text.
    pub length: usize,
    /// Whether `text` was cut.
    pub truncated: bool,
    /// Whitespace-separated words in the full cleaned text.
    pub word_count: usize,
}

/// Facts about the fetch itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Performance {
    /// Wall-clock fetch time in milliseconds, redirects included.
    pub load_time_ms: u64,
    /// Body size in bytes.
    pub content_length: usize,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// `Server` header.
    pub server: Option<String>,
    /// Charset from the content type, `"utf-8"` when unspecified.
    pub encoding: String,
    /// Number of redirects followed.
    pub redirect_count: usize,
}

/// Output of the extraction stages. A field is `None` when its stage was skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionResult {
    /// Metadata stage output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Links stage output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinkInventory>,
    /// Images stage output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageInventory>,
    /// Headings stage output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headings: Option<Headings>,
    /// Content stage output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Performance stage output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
}
