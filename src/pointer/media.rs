//! Media storage sink.
//!
//! Writes imported images under a dated uploads directory and records each
//! one as an attachment.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Datelike, Local};
use log::{debug, info};
use sqlx::SqlitePool;
use tokio::io::AsyncWriteExt;

use crate::error_handling::{DatabaseError, ImportError};
use crate::storage::{
    get_attachment, insert_attachment, list_for_post, AttachmentRecord, NewAttachment, PostStore,
};

/// An image ready to be stored for a post.
#[derive(Debug, Clone)]
pub struct MediaUpload<'a> {
    /// Post the image is imported for
    pub post_id: i64,
    /// Suggested file name; a numeric suffix is added when it is taken
    pub file_name: &'a str,
    /// MIME type of the file
    pub mime: &'a str,
    /// URL the bytes were downloaded from
    pub source_url: Option<&'a str>,
    /// File contents
    pub bytes: &'a [u8],
}

/// Destination for imported media.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persists `upload` and returns the stored attachment.
    async fn store(&self, upload: MediaUpload<'_>) -> Result<AttachmentRecord, ImportError>;

    /// Looks up an attachment by id.
    async fn find(&self, attachment_id: i64) -> Result<Option<AttachmentRecord>, DatabaseError>;

    /// Makes `attachment_id` the featured image of `post_id`.
    async fn set_featured(&self, post_id: i64, attachment_id: i64) -> Result<(), DatabaseError>;

    /// Every attachment imported for `post_id`, oldest first.
    async fn attachments_for(&self, post_id: i64) -> Result<Vec<AttachmentRecord>, DatabaseError>;
}

/// MIME type guessed from a file name's extension, if it is an image type.
pub fn image_mime_for(file_name: &str) -> Result<String, ImportError> {
    let guess = mime_guess::from_path(file_name).first();
    match guess {
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => Ok(mime.essence_str().to_string()),
        other => Err(ImportError::NotAnImage {
            file_name: file_name.to_string(),
            mime: other.map(|m| m.essence_str().to_string()).unwrap_or_default(),
        }),
    }
}

/// `name.ext` becomes `name-{n}.ext`; names without an extension get the suffix appended.
fn numbered_file_name(file_name: &str, n: usize) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{file_name}-{n}"),
    }
}

/// File name without its final extension.
fn title_for(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

/// Stores files on the local filesystem under `uploads/YYYY/MM`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    pool: SqlitePool,
    posts: PostStore,
}

impl LocalMediaStore {
    /// Creates a store writing below `root` and recording rows in `pool`.
    pub fn new(root: impl Into<PathBuf>, pool: SqlitePool) -> Self {
        LocalMediaStore {
            root: root.into(),
            posts: PostStore::new(pool.clone()),
            pool,
        }
    }

    /// Root of the uploads directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to the first free name in `dir` and returns that name.
    ///
    /// Files are created with `create_new`, so two concurrent imports of the
    /// same name never overwrite each other.
    async fn write_unique(
        dir: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, std::io::Error> {
        let mut candidate = file_name.to_string();
        let mut n = 0usize;
        loop {
            let path = dir.join(&candidate);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    n += 1;
                    candidate = numbered_file_name(file_name, n);
                    debug!("{} exists, trying {candidate}", path.display());
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, upload: MediaUpload<'_>) -> Result<AttachmentRecord, ImportError> {
        let now = Local::now();
        let subdir = format!("{:04}/{:02}", now.year(), now.month());
        let dir = self.root.join(&subdir);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = Self::write_unique(&dir, upload.file_name, upload.bytes).await?;
        let file_path = dir.join(&file_name);

        let attachment = NewAttachment {
            post_id: upload.post_id,
            file_path: file_path.to_string_lossy().into_owned(),
            file_name: file_name.clone(),
            mime_type: upload.mime.to_string(),
            title: title_for(&file_name).to_string(),
            guid: format!("uploads/{subdir}/{file_name}"),
            source_url: upload.source_url.map(str::to_string),
            byte_size: i64::try_from(upload.bytes.len()).unwrap_or(i64::MAX),
        };
        let id = match insert_attachment(&self.pool, &attachment).await {
            Ok(id) => id,
            Err(e) => {
                // Leave no orphaned file behind a failed insert
                if let Err(remove_err) = tokio::fs::remove_file(&file_path).await {
                    debug!("Failed to remove {}: {remove_err}", file_path.display());
                }
                return Err(e.into());
            }
        };
        info!(
            "Stored {} ({} bytes) as attachment {id} for post {}",
            file_path.display(),
            attachment.byte_size,
            upload.post_id
        );

        get_attachment(&self.pool, id)
            .await?
            .ok_or(ImportError::Database(DatabaseError::SqlError(
                sqlx::Error::RowNotFound,
            )))
    }

    async fn find(&self, attachment_id: i64) -> Result<Option<AttachmentRecord>, DatabaseError> {
        get_attachment(&self.pool, attachment_id).await
    }

    async fn set_featured(&self, post_id: i64, attachment_id: i64) -> Result<(), DatabaseError> {
        self.posts.set_thumbnail(post_id, attachment_id).await
    }

    async fn attachments_for(&self, post_id: i64) -> Result<Vec<AttachmentRecord>, DatabaseError> {
        list_for_post(&self.pool, post_id).await
    }
}
