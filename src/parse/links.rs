//! Link inventory extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::types::{Link, LinkInventory};
use crate::config::LINK_TEXT_MAX_CHARS;
use crate::utils::{parse_selector_unsafe, truncate_chars};

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "ANCHOR_SELECTOR"));

/// Extracts every anchor with an `href`, classified internal or external.
///
/// A link is internal iff its resolved host equals the host of `base`; links
/// that cannot be resolved or have no host are external. The returned
/// sequences are capped (`all` at `max_links`, each bucket at `max_links / 2`)
/// while the totals count every link.
pub fn extract_links(document: &Html, base: &Url, max_links: usize) -> LinkInventory {
    let bucket_cap = max_links / 2;
    let base_host = base.host_str();
    let mut inventory = LinkInventory::default();

    for element in document.select(&ANCHOR_SELECTOR) {
        let attrs = element.value();
        let Some(href) = attrs.attr("href").map(str::trim) else {
            continue;
        };

        let resolved = base.join(href).ok();
        let internal = match (&resolved, base_host) {
            (Some(url), Some(base_host)) => url.host_str() == Some(base_host),
            _ => false,
        };

        let text = element.text().collect::<String>();
        let link = Link {
            text: truncate_chars(text.trim(), LINK_TEXT_MAX_CHARS).to_string(),
            href: href.to_string(),
            url: resolved.map(String::from),
            title: attrs.attr("title").map(str::to_string),
            rel: attrs
                .attr("rel")
                .map(|rel| rel.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            target: attrs.attr("target").map(str::to_string),
            internal,
        };

        inventory.total += 1;
        if internal {
            inventory.total_internal += 1;
            if inventory.internal.len() < bucket_cap {
                inventory.internal.push(link.clone());
            }
        } else {
            inventory.total_external += 1;
            if inventory.external.len() < bucket_cap {
                inventory.external.push(link.clone());
            }
        }
        if inventory.all.len() < max_links {
            inventory.all.push(link);
        }
    }

    log::debug!(
        "Extracted {} links ({} internal, {} external)",
        inventory.total,
        inventory.total_internal,
        inventory.total_external
    );

    inventory
}
