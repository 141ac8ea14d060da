//! Performance facts derived from the fetch, without touching the document.

use super::types::Performance;
use crate::fetch::PageDocument;

const DEFAULT_ENCODING: &str = "utf-8";

/// Summarizes fetch metadata for `page`.
pub fn extract_performance(page: &PageDocument) -> Performance {
    let content_type = page.header("content-type").map(str::to_string);
    let encoding = content_type
        .as_deref()
        .and_then(charset_from_content_type)
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());

    Performance {
        load_time_ms: u64::try_from(page.elapsed.as_millis()).unwrap_or(u64::MAX),
        content_length: page.body.len(),
        server: page.header("server").map(str::to_string),
        content_type,
        encoding,
        redirect_count: page.redirect_count,
    }
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_lowercase())
    })
}
