//! Featured image import.
//!
//! Downloads the page's `og:image` and attaches it to the post, unless the
//! current featured image already came from the same URL.

use log::{debug, info};
use serde::Serialize;

use super::media::{image_mime_for, MediaUpload};
use super::PagePointer;
use crate::error_handling::{ImportError, InfoType};
use crate::utils::file_name_from_url;

/// Result of the image import step of a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The image was downloaded and set as featured image.
    Imported {
        /// New attachment id
        attachment_id: i64,
        /// File name chosen in the uploads directory
        file_name: String,
    },
    /// The featured image was already imported from this URL.
    AlreadyImported {
        /// Existing attachment id
        attachment_id: i64,
    },
    /// The page has no Open Graph image.
    NoImage,
    /// The import failed; the pointer was still saved.
    Failed {
        /// Human-readable failure reason
        reason: String,
    },
}

/// Resolves a possibly relative image reference against the page URL.
pub(crate) fn resolve_image_url(page_url: &str, image: &str) -> String {
    let image = image.replace('\\', "");
    match url::Url::parse(page_url).and_then(|base| base.join(&image)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => image,
    }
}

impl PagePointer {
    /// Imports `image_url` as the featured image of `post_id`.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::NotAnImage` before downloading anything when the
    /// URL has no file name or the name does not map to an image MIME type.
    pub async fn import_featured_image(
        &self,
        post_id: i64,
        image_url: &str,
    ) -> Result<ImportOutcome, ImportError> {
        if let Some(attachment_id) = self.posts.thumbnail_id(post_id).await? {
            let current = self.media.find(attachment_id).await?;
            if current.and_then(|a| a.source_url).as_deref() == Some(image_url) {
                debug!("Post {post_id} already features {image_url}");
                self.stats.increment_info(InfoType::ImageAlreadyImported);
                return Ok(ImportOutcome::AlreadyImported { attachment_id });
            }
        }

        let file_name = file_name_from_url(image_url).ok_or_else(|| ImportError::NotAnImage {
            file_name: image_url.to_string(),
            mime: String::new(),
        })?;
        let mime = image_mime_for(&file_name)?;

        let response = self.fetcher.fetcher().get(image_url).await?;
        let record = self
            .media
            .store(MediaUpload {
                post_id,
                file_name: &file_name,
                mime: &mime,
                source_url: Some(image_url),
                bytes: &response.body,
            })
            .await?;
        self.media.set_featured(post_id, record.id).await?;

        info!(
            "Imported {image_url} as attachment {} for post {post_id}",
            record.id
        );
        self.stats.increment_info(InfoType::ImageImported);
        Ok(ImportOutcome::Imported {
            attachment_id: record.id,
            file_name: record.file_name,
        })
    }
}
