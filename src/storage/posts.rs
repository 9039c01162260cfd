//! Post meta storage.
//!
//! Per-post key/value pairs: the pointer's target URL, the image import flag
//! and the featured attachment id.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::config::{META_IMPORT_FLAG, META_URL};
use crate::error_handling::DatabaseError;

/// Meta key holding a post's featured attachment id.
pub const META_THUMBNAIL_ID: &str = "_thumbnail_id";

/// Post meta accessor over a shared pool.
#[derive(Debug, Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

impl PostStore {
    /// Creates a store over a migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        PostStore { pool }
    }

    /// Returns the value stored under `meta_key` for `post_id`.
    pub async fn get_meta(
        &self,
        post_id: i64,
        meta_key: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT meta_value FROM post_meta WHERE post_id = ? AND meta_key = ?",
        )
        .bind(post_id)
        .bind(meta_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    /// Inserts or replaces a meta value.
    pub async fn set_meta(
        &self,
        post_id: i64,
        meta_key: &str,
        meta_value: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO post_meta (post_id, meta_key, meta_value, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(post_id, meta_key) DO UPDATE SET
             meta_value=excluded.meta_value,
             updated_at=excluded.updated_at",
        )
        .bind(post_id)
        .bind(meta_key)
        .bind(meta_value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Target URL of a pointer post; `None` when unset or empty.
    pub async fn pointer_url(&self, post_id: i64) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .get_meta(post_id, META_URL)
            .await?
            .filter(|url| !url.is_empty()))
    }

    /// Whether the post asks for its page's image to be imported.
    pub async fn import_flag(&self, post_id: i64) -> Result<bool, DatabaseError> {
        Ok(self
            .get_meta(post_id, META_IMPORT_FLAG)
            .await?
            .is_some_and(|flag| flag == "1"))
    }

    /// Stores the pointer URL and import flag together.
    ///
    /// `None` removes the pointer, turning the post back into a regular post.
    pub async fn set_pointer(
        &self,
        post_id: i64,
        url: Option<&str>,
        import: bool,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now().to_rfc3339();
        match url {
            Some(url) => {
                sqlx::query(
                    "INSERT INTO post_meta (post_id, meta_key, meta_value, updated_at)
                     VALUES (?, ?, ?, ?)
                     ON CONFLICT(post_id, meta_key) DO UPDATE SET
                     meta_value=excluded.meta_value,
                     updated_at=excluded.updated_at",
                )
                .bind(post_id)
                .bind(META_URL)
                .bind(url)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM post_meta WHERE post_id = ? AND meta_key = ?")
                    .bind(post_id)
                    .bind(META_URL)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        sqlx::query(
            "INSERT INTO post_meta (post_id, meta_key, meta_value, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(post_id, meta_key) DO UPDATE SET
             meta_value=excluded.meta_value,
             updated_at=excluded.updated_at",
        )
        .bind(post_id)
        .bind(META_IMPORT_FLAG)
        .bind(if import { "1" } else { "" })
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Featured attachment id, if one is set and well-formed.
    pub async fn thumbnail_id(&self, post_id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self
            .get_meta(post_id, META_THUMBNAIL_ID)
            .await?
            .and_then(|id| id.parse().ok()))
    }

    /// Sets the post's featured attachment.
    pub async fn set_thumbnail(
        &self,
        post_id: i64,
        attachment_id: i64,
    ) -> Result<(), DatabaseError> {
        self.set_meta(post_id, META_THUMBNAIL_ID, &attachment_id.to_string())
            .await
    }

    /// Ids of every post with a non-empty pointer URL.
    pub async fn pointer_posts(&self) -> Result<Vec<i64>, DatabaseError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT post_id FROM post_meta WHERE meta_key = ? AND meta_value != '' ORDER BY post_id",
        )
        .bind(META_URL)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
