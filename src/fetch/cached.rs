//! Read-through page cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cache::{transient_key, TransientCache};
use super::http::{HttpFetch, HttpResponse};
use crate::error_handling::{
    update_fetch_error_stats, ErrorType, FetchError, InfoType, ProcessingStats,
};

/// A fetched HTML page as stored in the transient cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPage {
    /// URL the page was fetched from
    pub url: String,
    /// HTTP status of the response
    pub status: u16,
    /// `Content-Type` header, if sent
    pub content_type: Option<String>,
    /// Body decoded as UTF-8 (lossy)
    pub body: String,
    /// When the page was downloaded
    pub fetched_at: DateTime<Utc>,
}

impl CachedPage {
    fn from_response(url: &str, response: HttpResponse) -> Self {
        CachedPage {
            url: url.to_string(),
            status: response.status,
            body: response.text(),
            content_type: response.content_type,
            fetched_at: Utc::now(),
        }
    }
}

/// Fetcher that consults a [`TransientCache`] before going to the network.
///
/// Only successful fetches are cached. Cache failures are logged and never
/// turn into fetch failures.
#[derive(Clone)]
pub struct CachedFetcher {
    fetcher: Arc<dyn HttpFetch>,
    cache: Arc<dyn TransientCache>,
    ttl: Duration,
    stats: Arc<ProcessingStats>,
}

impl CachedFetcher {
    /// Wraps `fetcher` so successful pages are kept in `cache` for `ttl`.
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        cache: Arc<dyn TransientCache>,
        ttl: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        CachedFetcher {
            fetcher,
            cache,
            ttl,
            stats,
        }
    }

    /// The underlying network fetcher, for downloads that must not be cached.
    pub fn fetcher(&self) -> &Arc<dyn HttpFetch> {
        &self.fetcher
    }

    /// Returns the page at `url`, from cache when a live entry exists.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error on a cache miss that fails to download.
    pub async fn fetch_page(&self, url: &str) -> Result<CachedPage, FetchError> {
        let key = transient_key(url);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CachedPage>(&raw) {
                Ok(page) => {
                    debug!("Cache hit for {url} ({key})");
                    self.stats.increment_info(InfoType::CacheHit);
                    return Ok(page);
                }
                Err(e) => {
                    warn!("Discarding corrupt cache entry {key} for {url}: {e}");
                    self.stats.increment_error(ErrorType::CacheError);
                    if let Err(e) = self.cache.delete(&key).await {
                        warn!("Failed to delete cache entry {key}: {e:#}");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!("Cache read failed for {url}: {e:#}");
                self.stats.increment_error(ErrorType::CacheError);
            }
        }

        self.stats.increment_info(InfoType::CacheMiss);
        let response = self.fetcher.get(url).await.inspect_err(|e| {
            warn!("Failed to fetch {url}: {e}");
            update_fetch_error_stats(&self.stats, e);
        })?;
        let page = CachedPage::from_response(url, response);

        match serde_json::to_string(&page) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, &raw, self.ttl).await {
                    warn!("Failed to cache {url}: {e:#}");
                    self.stats.increment_error(ErrorType::CacheError);
                }
            }
            Err(e) => warn!("Failed to serialize page {url} for caching: {e}"),
        }

        Ok(page)
    }

    /// Drops the cached copy of `url`, if any.
    pub async fn invalidate(&self, url: &str) -> anyhow::Result<()> {
        self.cache.delete(&transient_key(url)).await
    }

    /// Removes expired pages from the cache, returning how many were dropped.
    pub async fn purge_expired(&self) -> anyhow::Result<u64> {
        self.cache.purge_expired().await
    }
}
