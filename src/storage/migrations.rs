//! Database migration management.

use sqlx::SqlitePool;

use crate::error_handling::StoreError;

/// Runs SQLx migrations located in the `migrations/` directory.
///
/// # Errors
///
/// Returns `StoreError::MigrationError` if a migration cannot be read or applied.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    let migrations_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await?;
    Ok(())
}

/// Creates an in-memory database pool with migrations applied.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let pool = create_test_pool().await;
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('analyses', 'cache_entries') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("list tables");
        assert_eq!(tables, vec!["analyses", "cache_entries"]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = create_test_pool().await;
        run_migrations(&pool).await.expect("second run");
    }
}
