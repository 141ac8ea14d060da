//! Database operations.
//!
//! This module provides:
//! - SQLite pool initialization (WAL mode, file creation)
//! - Migrations for the `analyses` and `cache_entries` tables
//! - The [`Store`] trait and its SQLite implementation

mod migrations;
mod pool;
mod store;

// Re-export public API
#[cfg(test)]
pub(crate) use migrations::create_test_pool;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use store::{SqliteStore, StoredAnalysis, Store};
