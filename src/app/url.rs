//! URL validation, normalization, and input loading.

use std::path::Path;

use log::warn;

/// Maximum URL length accepted from input (common browser/server limit).
const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a URL.
///
/// Adds an `https://` prefix when no scheme is present, then checks that the
/// URL parses and uses http/https. Logs a warning and returns `None` for URLs
/// that are too long, malformed, or use another scheme.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            crate::utils::truncate_chars(url, 50)
        );
        return None;
    }

    let normalized = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.contains("://") {
        warn!("Skipping unsupported scheme for URL: {url}");
        return None;
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping normalized URL exceeding maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) if parsed.host_str().is_some() => Some(normalized),
        _ => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}

/// Reads URLs from a file, one per line.
///
/// Blank lines and lines starting with `#` are skipped. URLs are returned as
/// written; validation happens in the caller so rejected entries are logged
/// alongside command-line URLs.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub async fn read_urls(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
