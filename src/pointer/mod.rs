//! Page pointer orchestration.
//!
//! A pointer post stores the URL of an external page. Visitors are
//! redirected there, and the editor previews the page's Open Graph data and
//! can import its image as the post's featured image.
//!
//! [`PagePointer`] owns the collaborators (cached fetcher, post store, media
//! store) and is shared with the HTTP service behind an `Arc`.

mod import;
mod media;
mod preview;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error_handling::{
    update_import_error_stats, DatabaseError, FetchError, ImportError, ProcessingStats, SaveError,
    WarningType,
};
use crate::fetch::{CachedFetcher, PageFetcher};
use crate::initialization::{init_client, init_directory};
use crate::opengraph::OpenGraph;
use crate::storage::{init_db_pool_with_path, AttachmentRecord, PostStore, SqliteCache};
use crate::utils::validate_and_normalize_url;

pub use import::ImportOutcome;
pub use media::{image_mime_for, LocalMediaStore, MediaStore, MediaUpload};
pub use preview::{render_error, Preview, UNKNOWN_SITE};

/// Pointer fields submitted with a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePost {
    /// Post being saved
    pub post_id: i64,
    /// Target URL; empty or `None` turns the post back into a regular post
    pub url: Option<String>,
    /// Whether to import the page's image as featured image
    pub import: bool,
}

/// What a save stored and whether an image was imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Post that was saved
    pub post_id: i64,
    /// Normalized target URL, `None` when the pointer was cleared
    pub url: Option<String>,
    /// Import result, `None` when no import was requested
    pub import: Option<ImportOutcome>,
}

/// A stored pointer with the media imported for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointerSummary {
    /// Pointer post
    pub post_id: i64,
    /// Redirect target
    pub url: String,
    /// Whether image import is requested on save
    pub import: bool,
    /// Current featured attachment id
    pub thumbnail_id: Option<i64>,
    /// Attachments imported for the post, oldest first
    pub attachments: Vec<AttachmentRecord>,
}

/// The page pointer service.
#[derive(Clone)]
pub struct PagePointer {
    fetcher: CachedFetcher,
    posts: PostStore,
    media: Arc<dyn MediaStore>,
    stats: Arc<ProcessingStats>,
}

impl PagePointer {
    /// Assembles a service from its collaborators.
    pub fn new(
        fetcher: CachedFetcher,
        posts: PostStore,
        media: Arc<dyn MediaStore>,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        PagePointer {
            fetcher,
            posts,
            media,
            stats,
        }
    }

    /// Builds the service described by `config`.
    ///
    /// Opens (and migrates) the SQLite database, creates the uploads
    /// directory and builds the shared HTTP client. Page fetches are cached
    /// in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any resource
    /// cannot be initialized.
    pub async fn open(config: &Config) -> Result<PagePointer> {
        config.validate().context("Invalid configuration")?;
        init_directory(&config.uploads_dir).context("Failed to create uploads directory")?;
        let pool = init_db_pool_with_path(&config.db_path)
            .await
            .context("Failed to initialize database")?;
        let client = init_client(config).context("Failed to initialize HTTP client")?;

        let stats = Arc::new(ProcessingStats::new());
        let fetcher = CachedFetcher::new(
            Arc::new(PageFetcher::new(client)),
            Arc::new(SqliteCache::new(pool.clone())),
            config.cache_ttl(),
            Arc::clone(&stats),
        );
        let media = Arc::new(LocalMediaStore::new(&config.uploads_dir, pool.clone()));
        info!(
            "Page pointer ready (database {}, uploads {})",
            config.db_path.display(),
            config.uploads_dir.display()
        );
        Ok(PagePointer::new(fetcher, PostStore::new(pool), media, stats))
    }

    /// Shared processing statistics.
    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.stats
    }

    /// Post meta store backing the pointers.
    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    /// Fetches `url` (through the cache) and parses its Open Graph data.
    ///
    /// A page without Open Graph data is a successful preview with no page.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, to be shown to the editor.
    pub async fn preview(&self, url: &str) -> Result<Preview, FetchError> {
        let url = validate_and_normalize_url(url)
            .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;
        let cached = self.fetcher.fetch_page(&url).await?;
        let page = OpenGraph::parse(&cached.body);
        self.record_warnings(&url, page.as_ref());
        Ok(Preview { url, page })
    }

    fn record_warnings(&self, url: &str, page: Option<&OpenGraph>) {
        let Some(page) = page else {
            debug!("{url} carries no Open Graph data");
            self.stats.increment_warning(WarningType::MissingOpenGraph);
            return;
        };
        let missing = [
            ("title", WarningType::MissingTitle),
            ("image", WarningType::MissingImage),
            ("site_name", WarningType::MissingSiteName),
        ];
        for (key, warning) in missing {
            if !page.has(key) {
                self.stats.increment_warning(warning);
            }
        }
    }

    /// Stores a post's pointer and optionally imports the page's image.
    ///
    /// The pointer is saved before the import starts; an import failure is
    /// logged and reported in the outcome but never fails the save.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::InvalidUrl` for a non-empty URL that is not a
    /// valid http(s) URL, or `SaveError::Database` if storing fails.
    pub async fn save_post(&self, post: SavePost) -> Result<SaveOutcome, SaveError> {
        let url = match post.url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                validate_and_normalize_url(raw)
                    .ok_or_else(|| SaveError::InvalidUrl(raw.to_string()))?,
            ),
        };

        self.posts
            .set_pointer(post.post_id, url.as_deref(), post.import)
            .await?;
        match &url {
            Some(url) => info!("Post {} now points to {url}", post.post_id),
            None => info!("Post {} is no longer a pointer", post.post_id),
        }

        let import = match (&url, post.import) {
            (Some(url), true) => Some(self.import_from_page(post.post_id, url).await),
            _ => None,
        };

        Ok(SaveOutcome {
            post_id: post.post_id,
            url,
            import,
        })
    }

    async fn import_from_page(&self, post_id: i64, url: &str) -> ImportOutcome {
        let page = match self.fetcher.fetch_page(url).await {
            Ok(cached) => OpenGraph::parse(&cached.body),
            Err(e) => {
                warn!("Skipping image import for post {post_id}: {e}");
                return ImportOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };
        let Some(image) = page
            .as_ref()
            .and_then(OpenGraph::image)
            .filter(|image| !image.is_empty())
        else {
            debug!("No Open Graph image on {url}");
            return ImportOutcome::NoImage;
        };

        let image_url = import::resolve_image_url(url, image);
        match self.import_featured_image(post_id, &image_url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to import {image_url} for post {post_id}: {e}");
                update_import_error_stats(&self.stats, &e);
                e.into()
            }
        }
    }

    /// Target URL visitors of `post_id` are redirected to.
    pub async fn redirect_target(&self, post_id: i64) -> Result<Option<String>, DatabaseError> {
        self.posts.pointer_url(post_id).await
    }

    /// Returns `true` if `post_id` has a pointer URL.
    pub async fn is_pointer(&self, post_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.redirect_target(post_id).await?.is_some())
    }

    /// Every pointer post, by ascending id.
    pub async fn list_pointers(&self) -> Result<Vec<PointerSummary>, DatabaseError> {
        let mut summaries = Vec::new();
        for post_id in self.posts.pointer_posts().await? {
            // Cleared between the two queries
            let Some(url) = self.posts.pointer_url(post_id).await? else {
                continue;
            };
            summaries.push(PointerSummary {
                post_id,
                url,
                import: self.posts.import_flag(post_id).await?,
                thumbnail_id: self.posts.thumbnail_id(post_id).await?,
                attachments: self.media.attachments_for(post_id).await?,
            });
        }
        Ok(summaries)
    }

    /// Drops the cached page for `url` so the next preview refetches it.
    ///
    /// URLs that cannot be pointers are never cached, so there is nothing to drop.
    pub async fn forget_preview(&self, url: &str) -> Result<()> {
        let Some(url) = validate_and_normalize_url(url) else {
            return Ok(());
        };
        self.fetcher
            .invalidate(&url)
            .await
            .with_context(|| format!("Failed to drop cached page for {url}"))?;
        debug!("Dropped cached page for {url}");
        Ok(())
    }

    /// Removes expired pages from the fetch cache.
    pub async fn purge_expired_cache(&self) -> Result<u64> {
        self.fetcher
            .purge_expired()
            .await
            .context("Failed to purge expired cache entries")
    }
}

impl From<ImportError> for ImportOutcome {
    fn from(error: ImportError) -> Self {
        ImportOutcome::Failed {
            reason: error.to_string(),
        }
    }
}
