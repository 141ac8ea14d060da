//! Visible text extraction.

use scraper::{Html, Node};

use super::types::Content;
use crate::utils::{char_len, truncate_chars};

const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Extracts the visible text of the document.
///
/// Text inside `script`, `style`, and `noscript` is dropped. The remaining
/// text is split into lines and double-space separated phrases, each trimmed,
/// and non-empty pieces are joined with newlines. `length` and `word_count`
/// describe the full cleaned text; `text` is cut to `max_content_length`
/// characters.
pub fn extract_content(document: &Html, max_content_length: usize) -> Content {
    let raw = visible_text(document);
    let cleaned = clean_text(&raw);
    let length = char_len(&cleaned);
    let text = truncate_chars(&cleaned, max_content_length).to_string();

    Content {
        truncated: char_len(&text) < length,
        word_count: cleaned.split_whitespace().count(),
        text,
        length,
    }
}

fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
