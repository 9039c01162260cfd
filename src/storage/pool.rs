//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled for concurrent access
//! - Automatic database file creation
//! - Schema migrations applied on startup

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{error, info};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use super::migrations::run_migrations;
use crate::error_handling::DatabaseError;

/// Initializes a migrated connection pool for the database at `db_path`.
///
/// Creates the database file (and its parent directory) if it doesn't exist
/// and enables WAL mode.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<SqlitePool, DatabaseError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            error!("Failed to create database directory {}: {e}", parent.display());
            DatabaseError::FileCreationError(e.to_string())
        })?;
    }

    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(db_path)
    {
        Ok(_) => info!("Database file {} created.", db_path.display()),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Using existing database {}.", db_path.display())
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy()))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Initializes a migrated in-memory database.
///
/// Limited to one connection: every SQLite in-memory connection is a separate database.
pub async fn init_memory_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_db_pool_creates_file_and_schema() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("nested").join("pointer.db");
        let pool = init_db_pool_with_path(&db_path).await.expect("pool");
        assert!(db_path.exists());

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('post_meta', 'attachments', 'transients') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("list tables");
        assert_eq!(tables, vec!["attachments", "post_meta", "transients"]);
    }

    #[tokio::test]
    async fn test_init_db_pool_reopens_existing_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("pointer.db");
        let pool = init_db_pool_with_path(&db_path).await.expect("first open");
        pool.close().await;
        assert!(init_db_pool_with_path(&db_path).await.is_ok());
    }

    #[tokio::test]
    async fn test_init_memory_pool() {
        let pool = init_memory_pool().await.expect("memory pool");
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transients")
            .fetch_one(&pool)
            .await
            .expect("query");
        assert_eq!(count, 0);
    }
}
