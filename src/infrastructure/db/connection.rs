use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::{AppError, Result};

const SCHEMA: &str = include_str!("schema.sql");

const SCHEMA_VERSION: i32 = 1;

pub async fn init_db(db_path: &Path) -> Result<SqlitePool> {
    let db_url = db_path_to_url(db_path)?;
    let options = SqliteConnectOptions::from_str(&db_url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {e}")))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {e}")))?;

    prepare_pool(&pool).await?;

    Ok(pool)
}

/// In-memory pool for tests. Single connection, since each sqlite
/// memory connection is its own database.
pub async fn init_memory_db() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {e}")))?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {e}")))?;

    prepare_pool(&pool).await?;

    Ok(pool)
}

async fn prepare_pool(pool: &SqlitePool) -> Result<()> {
    // PRAGMA user_version tracks the schema revision. Fail fast when the
    // file was written by a newer build.
    let current_version = read_user_version(pool).await?;
    if current_version > SCHEMA_VERSION {
        return Err(AppError::DatabaseError(format!(
            "Database schema too new: user_version={} > supported_version={}",
            current_version, SCHEMA_VERSION
        )));
    }

    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to apply schema: {e}")))?;

    set_user_version(pool, SCHEMA_VERSION).await?;

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {e}")))?;

    Ok(())
}

fn db_path_to_url(db_path: &Path) -> Result<String> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| AppError::DatabaseError("Database path is not valid UTF-8".to_string()))?;
    Ok(format!("sqlite://{}", db_path_str.replace('\\', "/")))
}

async fn read_user_version(pool: &SqlitePool) -> Result<i32> {
    let version: i32 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to read user_version: {e}")))?;
    Ok(version)
}

async fn set_user_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query(&format!("PRAGMA user_version = {}", version))
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to set user_version: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_db_initializes_schema() {
        let pool = init_memory_db().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert!(tables.contains(&"questionnaires".to_string()));
        assert!(tables.contains(&"questions".to_string()));
        assert!(tables.contains(&"share_links".to_string()));
        assert!(tables.contains(&"suggestions".to_string()));
    }

    #[tokio::test]
    async fn test_user_version_stamped() {
        let pool = init_memory_db().await.unwrap();
        assert_eq!(read_user_version(&pool).await.unwrap(), SCHEMA_VERSION);
    }
}
