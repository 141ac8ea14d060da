//! Request-fingerprint cache.
//!
//! This module provides:
//! - Deterministic cache keys over (URL, settings)
//! - [`CacheStore`], which enforces TTLs on read against an injectable [`Clock`]
//! - Backends: process-local [`MemoryBackend`] and [`SqliteCacheBackend`]
//!
//! Cache failures never fail an analysis; they are logged and treated as misses.

mod backend;
mod clock;
mod key;
mod sqlite;
mod store;

pub use backend::{CacheBackend, MemoryBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use key::derive_cache_key;
pub use sqlite::SqliteCacheBackend;
pub use store::{CacheEntry, CacheLookup, CacheStats, CacheStore};
