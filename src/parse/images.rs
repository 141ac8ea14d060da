//! Image inventory extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::types::{Image, ImageInventory};
use crate::config::MAX_IMAGES;
use crate::utils::parse_selector_unsafe;

const DEFAULT_LOADING: &str = "eager";

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("img[src]", "IMG_SELECTOR"));

/// Extracts every image with a non-empty `src`.
///
/// The returned sequence holds at most `MAX_IMAGES` entries; `total`,
/// `with_alt`, and `without_alt` count every image.
pub fn extract_images(document: &Html, base: &Url) -> ImageInventory {
    let mut inventory = ImageInventory::default();

    for element in document.select(&IMG_SELECTOR) {
        let attrs = element.value();
        let src = attrs.attr("src").unwrap_or("").trim();
        if src.is_empty() {
            continue;
        }

        let alt = attrs.attr("alt").unwrap_or("").trim().to_string();
        inventory.total += 1;
        if alt.is_empty() {
            inventory.without_alt += 1;
        } else {
            inventory.with_alt += 1;
        }

        if inventory.images.len() < MAX_IMAGES {
            inventory.images.push(Image {
                src: src.to_string(),
                url: base.join(src).ok().map(String::from),
                alt,
                title: attrs.attr("title").map(str::to_string),
                width: attrs.attr("width").map(str::to_string),
                height: attrs.attr("height").map(str::to_string),
                loading: attrs
                    .attr("loading")
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .unwrap_or(DEFAULT_LOADING)
                    .to_string(),
            });
        }
    }

    log::debug!(
        "Extracted {} images ({} without alt)",
        inventory.total,
        inventory.without_alt
    );

    inventory
}
