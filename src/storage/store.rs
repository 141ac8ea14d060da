//! Analysis record persistence.

use async_trait::async_trait;
use log::debug;
use sqlx::{Row, SqlitePool};

use crate::error_handling::StoreError;
use crate::pipeline::AnalysisRecord;

/// A persisted record with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnalysis {
    /// Identifier assigned on save.
    pub id: i64,
    /// The record.
    pub record: AnalysisRecord,
}

/// Durable storage for analysis records.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persists `record` and returns its new identifier.
    async fn save(&self, record: &AnalysisRecord) -> Result<i64, StoreError>;

    /// Loads the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such record exists.
    async fn get(&self, id: i64) -> Result<AnalysisRecord, StoreError>;

    /// Lists records newest first, skipping `skip` and returning at most `limit`.
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<StoredAnalysis>, StoreError>;
}

/// Stores records in the `analyses` table as JSON plus summary columns.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Uses `pool`, which must have had migrations applied.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl Store for SqliteStore {
    async fn save(&self, record: &AnalysisRecord) -> Result<i64, StoreError> {
        let record_json = serde_json::to_string(record)?;
        let (seo_score, seo_grade) = match &record.seo_analysis {
            Some(report) => (Some(i64::from(report.score)), Some(report.grade.as_str())),
            None => (None, None),
        };

        let result = sqlx::query(
            "INSERT INTO analyses (url, final_url, status_code, title, seo_score, seo_grade, record_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.url)
        .bind(&record.final_url)
        .bind(i64::from(record.status_code))
        .bind(&record.title)
        .bind(seo_score)
        .bind(seo_grade)
        .bind(record_json)
        .bind(record.timestamp.timestamp_millis())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Saved analysis {} for {}", id, record.url);
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<AnalysisRecord, StoreError> {
        let row = sqlx::query("SELECT record_json FROM analyses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        let json: String = row.get("record_json");
        Ok(serde_json::from_str(&json)?)
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<StoredAnalysis>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, record_json FROM analyses ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(to_i64(limit))
        .bind(to_i64(skip))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let json: String = row.get("record_json");
                Ok(StoredAnalysis {
                    id: row.get("id"),
                    record: serde_json::from_str(&json)?,
                })
            })
            .collect()
    }
}
