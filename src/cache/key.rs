//! Cache key derivation.

use sha2::{Digest, Sha256};

use crate::config::CACHE_KEY_PREFIX;
use crate::pipeline::AnalysisSettings;

/// Derives the cache key for analyzing `url` with `settings`.
///
/// The key is `"analysis:"` followed by the lowercase hex SHA-256 of the
/// settings' canonical form concatenated with the raw URL. The URL is hashed
/// as given; callers that want `example.com` and `https://example.com/` to
/// share an entry must normalize first.
pub fn derive_cache_key(url: &str, settings: &AnalysisSettings) -> String {
    let mut hasher = Sha256::new();
    hasher.update(settings.canonical_form().as_bytes());
    hasher.update(url.as_bytes());
    format!("{}{:x}", CACHE_KEY_PREFIX, hasher.finalize())
}
