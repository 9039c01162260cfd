//! Attachment records for imported media.

use chrono::Utc;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

/// Attachment about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// Post the file was imported for
    pub post_id: i64,
    /// Absolute or uploads-relative path of the stored file
    pub file_path: String,
    /// Name of the stored file
    pub file_name: String,
    /// MIME type guessed from the file name
    pub mime_type: String,
    /// Human-readable title (the file name without its extension)
    pub title: String,
    /// Public identifier of the file, `uploads/YYYY/MM/name.ext`
    pub guid: String,
    /// URL the file was downloaded from
    pub source_url: Option<String>,
    /// File size in bytes
    pub byte_size: i64,
}

/// A stored attachment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentRecord {
    /// Attachment id
    pub id: i64,
    /// Post the file was imported for
    pub post_id: i64,
    /// Path of the stored file
    pub file_path: String,
    /// Name of the stored file
    pub file_name: String,
    /// MIME type of the file
    pub mime_type: String,
    /// File name without its extension
    pub title: String,
    /// Public identifier, `uploads/YYYY/MM/name.ext`
    pub guid: String,
    /// URL the file was downloaded from
    pub source_url: Option<String>,
    /// File size in bytes
    pub byte_size: i64,
    /// RFC 3339 creation time
    pub created_at: String,
}

const SELECT_COLUMNS: &str = "SELECT id, post_id, file_path, file_name, mime_type, title, guid,
     source_url, byte_size, created_at FROM attachments";

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> AttachmentRecord {
    AttachmentRecord {
        id: row.get::<i64, _>("id"),
        post_id: row.get::<i64, _>("post_id"),
        file_path: row.get::<String, _>("file_path"),
        file_name: row.get::<String, _>("file_name"),
        mime_type: row.get::<String, _>("mime_type"),
        title: row.get::<String, _>("title"),
        guid: row.get::<String, _>("guid"),
        source_url: row.get::<Option<String>, _>("source_url"),
        byte_size: row.get::<i64, _>("byte_size"),
        created_at: row.get::<String, _>("created_at"),
    }
}

/// Inserts an attachment and returns its id.
pub async fn insert_attachment(
    pool: &SqlitePool,
    attachment: &NewAttachment,
) -> Result<i64, DatabaseError> {
    let result = sqlx::query(
        "INSERT INTO attachments
         (post_id, file_path, file_name, mime_type, title, guid, source_url, byte_size, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(attachment.post_id)
    .bind(&attachment.file_path)
    .bind(&attachment.file_name)
    .bind(&attachment.mime_type)
    .bind(&attachment.title)
    .bind(&attachment.guid)
    .bind(&attachment.source_url)
    .bind(attachment.byte_size)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Looks up an attachment by id.
pub async fn get_attachment(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<AttachmentRecord>, DatabaseError> {
    let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

/// Attachments imported for `post_id`, oldest first.
pub async fn list_for_post(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<AttachmentRecord>, DatabaseError> {
    let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE post_id = ? ORDER BY id"))
        .bind(post_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(record_from_row).collect())
}
