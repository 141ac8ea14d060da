//! SQLite-backed cache backend.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::backend::CacheBackend;
use crate::error_handling::CacheError;

/// Stores cache entries in the `cache_entries` table.
///
/// Native expiry is an `expires_at` column in Unix milliseconds. Rows past it
/// are deleted when read, and every write sweeps all of them.
#[derive(Clone)]
pub struct SqliteCacheBackend {
    pool: SqlitePool,
}

impl SqliteCacheBackend {
    /// Uses `pool`, which must have had migrations applied.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[async_trait]
impl CacheBackend for SqliteCacheBackend {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = now_millis();
        sqlx::query("DELETE FROM cache_entries WHERE key = ? AND expires_at <= ?")
            .bind(key)
            .bind(now)
            .execute(&self.pool)
            .await?;
        let row = sqlx::query(
            "SELECT value FROM cache_entries WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    async fn set_raw(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let now = now_millis();
        let expires_at =
            ttl.map(|ttl| now.saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)));
        sqlx::query("DELETE FROM cache_entries WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "INSERT INTO cache_entries (key, value, expires_at, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM cache_entries")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn key_count(&self) -> Result<usize, CacheError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cache_entries WHERE expires_at IS NULL OR expires_at > ?",
        )
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn memory_used(&self) -> Result<usize, CacheError> {
        let bytes: Option<i64> =
            sqlx::query_scalar("SELECT SUM(LENGTH(key) + LENGTH(value)) FROM cache_entries")
                .fetch_one(&self.pool)
                .await?;
        Ok(bytes.and_then(|b| usize::try_from(b).ok()).unwrap_or(0))
    }
}
