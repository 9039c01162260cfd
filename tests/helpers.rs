// Shared test helpers for building a page pointer service.
//
// Each helper builds a service over an in-memory database, an in-memory
// page cache and a scratch uploads directory.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use page_pointer::{
    init_memory_pool, CachedFetcher, LocalMediaStore, MemoryCache, PageFetcher, PagePointer,
    PostStore, ProcessingStats,
};

/// A service plus the scratch directory its uploads live in.
pub struct TestPointer {
    pub pointer: PagePointer,
    pub uploads: TempDir,
}

/// Builds a service with a one-hour page cache.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pointer() -> TestPointer {
    create_test_pointer_with_ttl(Duration::from_secs(3600)).await
}

/// Builds a service whose cached pages live for `ttl`.
pub async fn create_test_pointer_with_ttl(ttl: Duration) -> TestPointer {
    let pool = init_memory_pool()
        .await
        .expect("Failed to create test database pool");
    let uploads = TempDir::new().expect("Failed to create uploads directory");
    let stats = Arc::new(ProcessingStats::new());
    let fetcher = CachedFetcher::new(
        Arc::new(PageFetcher::new(Arc::new(reqwest::Client::new()))),
        Arc::new(MemoryCache::new()),
        ttl,
        Arc::clone(&stats),
    );
    let media = Arc::new(LocalMediaStore::new(uploads.path(), pool.clone()));
    TestPointer {
        pointer: PagePointer::new(fetcher, PostStore::new(pool), media, stats),
        uploads,
    }
}

/// HTML page carrying the given Open Graph image.
#[allow(dead_code)] // Used by other test files
pub fn page_with_image(image_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Story</title>
  <meta property="og:title" content="A Story">
  <meta property="og:site_name" content="News Site">
  <meta property="og:type" content="article">
  <meta property="og:image" content="{image_url}">
</head>
<body><p>Body</p></body>
</html>"#
    )
}

/// Every file below `dir`, recursively.
#[allow(dead_code)] // Used by other test files
pub fn files_under(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).expect("Failed to read directory") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
