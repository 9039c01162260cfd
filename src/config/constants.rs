//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including cache lifetimes, size limits, and default paths.

/// Default SQLite database path.
pub const DB_PATH: &str = "./page_pointer.db";

/// Default directory receiving imported images.
pub const UPLOADS_DIR: &str = "./uploads";

/// Default port for the redirect/preview service.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Per-request timeout in seconds for page and image downloads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Transient cache
/// Lifetime of a cached page fetch in seconds (one hour).
pub const TRANSIENT_TTL_SECS: u64 = 3600;
/// Prefix of transient cache keys; the hex SHA-256 of the URL follows.
pub const TRANSIENT_KEY_PREFIX: &str = "_pp_";
/// Seconds between sweeps of expired cache entries while serving.
pub const CACHE_PURGE_INTERVAL_SECS: u64 = 600;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum response body size in bytes (5MB)
/// Covers HTML pages and the images imported from them
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Maximum URL length accepted for a pointer (2048 characters).
pub const MAX_URL_LENGTH: usize = 2048;

// Redirect handling
/// Maximum number of redirect hops followed when fetching a page
pub const MAX_REDIRECT_HOPS: usize = 10;

// Post meta keys
/// Target URL of a pointer post.
pub const META_URL: &str = "_page_pointer_url";
/// Whether the pointed-to image should be imported.
pub const META_IMPORT_FLAG: &str = "_page_pointer_import";
