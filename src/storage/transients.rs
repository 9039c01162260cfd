//! SQLite-backed transient cache.
//!
//! Entries survive restarts. Expiry is stored as a Unix timestamp in seconds
//! and checked on read; `purge_expired` reclaims the rows.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::fetch::TransientCache;

/// [`TransientCache`] stored in the `transients` table.
#[derive(Debug, Clone)]
pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    /// Creates a cache over a migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCache { pool }
    }
}

#[async_trait]
impl TransientCache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM transients WHERE cache_key = ? AND expires_at > ?",
        )
        .bind(key)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read transient {key}"))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = Utc::now().timestamp().saturating_add(ttl_secs);
        sqlx::query(
            "INSERT INTO transients (cache_key, value, expires_at) VALUES (?, ?, ?)
             ON CONFLICT(cache_key) DO UPDATE SET
             value=excluded.value,
             expires_at=excluded.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write transient {key}"))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM transients WHERE cache_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete transient {key}"))?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM transients WHERE expires_at <= ?")
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .context("Failed to purge expired transients")?;
        Ok(result.rows_affected())
    }
}
