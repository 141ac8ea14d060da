//! TTL-enforcing cache store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::backend::CacheBackend;
use super::clock::{Clock, SystemClock};
use crate::config::CACHE_BACKEND_GRACE;

/// Stored form of a cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Cached analysis payload.
    pub result: Value,
    /// When the entry was written.
    pub cached_at: DateTime<Utc>,
    /// Lifetime in whole seconds the entry was written with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A live entry.
    Hit(Value),
    /// No entry.
    Miss,
    /// An entry existed but was past its TTL and has been deleted.
    Expired,
    /// The backend failed or the entry could not be decoded.
    Unavailable,
}

impl CacheLookup {
    /// Returns the payload on a hit.
    pub fn into_hit(self) -> Option<Value> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            _ => None,
        }
    }
}

/// Snapshot of cache usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Live entries in the backend.
    pub key_count: usize,
    /// Approximate bytes held by the backend.
    pub memory_used: usize,
    /// Lookups that returned a payload.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
    /// `hits / max(hits + misses, 1)`.
    pub hit_rate: f64,
}

/// Fingerprint-to-payload cache with application-level TTL enforcement.
///
/// Expiry is checked on every read against the injected [`Clock`]; expired
/// entries are deleted at that point. There is no background sweeper. Backend
/// failures are logged and degrade to a miss or a no-op.
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStore {
    /// Creates a store over `backend` using wall-clock time.
    pub fn new(backend: Arc<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// TTL applied when `set` is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Looks up `key`, deleting it if it has expired.
    pub async fn lookup(&self, key: &str) -> CacheLookup {
        let lookup = self.lookup_inner(key).await;
        match lookup {
            CacheLookup::Hit(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            _ => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        lookup
    }

    async fn lookup_inner(&self, key: &str) -> CacheLookup {
        let raw = match self.backend.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                warn!("Cache read failed for {key}: {e}");
                return CacheLookup::Unavailable;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding undecodable cache entry {key}: {e}");
                return CacheLookup::Unavailable;
            }
        };

        let ttl_secs = entry.ttl.unwrap_or(self.default_ttl.as_secs());
        let expires_at = i64::try_from(ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|ttl| entry.cached_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        if self.clock.now() > expires_at {
            debug!("Cache entry {key} expired at {expires_at}");
            if let Err(e) = self.backend.delete(key).await {
                warn!("Failed to delete expired cache entry {key}: {e}");
            }
            return CacheLookup::Expired;
        }

        CacheLookup::Hit(entry.result)
    }

    /// Returns the payload for `key`, or `None` when absent, expired, or unreadable.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).await.into_hit()
    }

    /// Stores `payload` under `key`, stamped with the current time.
    ///
    /// TTLs have whole-second resolution; fractions round up. Overwrites any
    /// existing entry. Returns `false` if the write failed.
    pub async fn set(&self, key: &str, payload: &Value, ttl: Option<Duration>) -> bool {
        let ttl_secs = whole_seconds(ttl.unwrap_or(self.default_ttl));
        let entry = CacheEntry {
            result: payload.clone(),
            cached_at: self.clock.now(),
            ttl: Some(ttl_secs),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode cache entry {key}: {e}");
                return false;
            }
        };
        // Native expiry trails the entry TTL so lookups see and delete the entry
        let native_ttl = Duration::from_secs(ttl_secs).saturating_add(CACHE_BACKEND_GRACE);
        match self.backend.set_raw(key, raw, Some(native_ttl)).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache write failed for {key}: {e}");
                false
            }
        }
    }

    /// Removes `key`. Returns whether an entry was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.backend.delete(key).await.unwrap_or_else(|e| {
            warn!("Cache delete failed for {key}: {e}");
            false
        })
    }

    /// Removes every entry. Returns `false` if the backend failed.
    pub async fn clear_all(&self) -> bool {
        match self.backend.clear().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache clear failed: {e}");
                false
            }
        }
    }

    /// Returns usage statistics. Backend failures report zero counts.
    pub async fn stats(&self) -> CacheStats {
        let key_count = self.backend.key_count().await.unwrap_or_else(|e| {
            warn!("Cache key count failed: {e}");
            0
        });
        let memory_used = self.backend.memory_used().await.unwrap_or_else(|e| {
            warn!("Cache memory usage failed: {e}");
            0
        });
        let hits = self.hits.load(Ordering::SeqCst);
        let misses = self.misses.load(Ordering::SeqCst);
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = hits as f64 / (hits + misses).max(1) as f64;

        CacheStats {
            key_count,
            memory_used,
            hits,
            misses,
            hit_rate,
        }
    }
}

fn whole_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}
