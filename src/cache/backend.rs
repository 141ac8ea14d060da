//! Key-value backends for the cache store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error_handling::CacheError;

/// A string key-value store with optional native expiry.
///
/// Native expiry is a backstop only; `CacheStore` enforces TTLs itself.
/// Natively expired entries are removed when found, never returned.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value, or `None` when absent or natively expired.
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value`, replacing any previous value.
    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>)
        -> Result<(), CacheError>;

    /// Removes `key`. Returns whether anything was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Removes every entry.
    async fn clear(&self) -> Result<(), CacheError>;

    /// Number of stored entries.
    async fn key_count(&self) -> Result<usize, CacheError>;

    /// Approximate bytes held by keys and values.
    async fn memory_used(&self) -> Result<usize, CacheError>;
}

struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// Process-local backend. Entries are lost when the process exits.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = ttl.and_then(|ttl| now.checked_add(ttl));
        let mut entries = self.entries.write().await;
        // Sweep keys that expired without ever being read again
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.to_string(), MemoryEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn key_count(&self) -> Result<usize, CacheError> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count())
    }

    async fn memory_used(&self) -> Result<usize, CacheError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|(key, entry)| key.len() + entry.value.len())
            .sum())
    }
}
