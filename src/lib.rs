//! page_pointer library: posts that point at pages elsewhere on the web
//!
//! A pointer post stores the URL of an external page. Visitors are
//! redirected to that page, while the post itself shows the page's Open
//! Graph title, site name and image, which can be imported as the post's
//! featured image.
//!
//! # Example
//!
//! ```no_run
//! use page_pointer::{Config, PagePointer, SavePost};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pointer = PagePointer::open(&Config::default()).await?;
//!
//! let preview = pointer.preview("https://example.com/article").await?;
//! println!("{}", preview.render_html(false));
//!
//! let outcome = pointer
//!     .save_post(SavePost {
//!         post_id: 42,
//!         url: Some("https://example.com/article".to_string()),
//!         import: true,
//!     })
//!     .await?;
//! println!("Import: {:?}", outcome.import);
//! # Ok(())
//! # }
//! ```
//!
//! The extractor works without any runtime:
//!
//! ```
//! use page_pointer::OpenGraph;
//!
//! let page = OpenGraph::parse(r#"<meta property="og:type" content="restaurant">"#).unwrap();
//! assert_eq!(page.get("schema"), Some("business"));
//! ```
//!
//! # Requirements
//!
//! Everything except [`OpenGraph::parse`] requires a Tokio runtime.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod opengraph;
mod pointer;
pub mod server;
mod storage;
mod utils;

// Re-export public API
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel};
pub use error_handling::{
    DatabaseError, ErrorType, FetchError, ImportError, InfoType, InitializationError,
    ProcessingStats, SaveError, StatsSnapshot, WarningType,
};
pub use fetch::{
    transient_key, CachedFetcher, CachedPage, HttpFetch, HttpResponse, MemoryCache, PageFetcher,
    TransientCache,
};
pub use opengraph::{Entries, OpenGraph, Schema};
pub use pointer::{
    image_mime_for, render_error, ImportOutcome, LocalMediaStore, MediaStore, MediaUpload,
    PagePointer, PointerSummary, Preview, SaveOutcome, SavePost, UNKNOWN_SITE,
};
pub use storage::{
    init_db_pool_with_path, init_memory_pool, AttachmentRecord, NewAttachment, PostStore,
    SqliteCache,
};
pub use utils::{file_name_from_url, validate_and_normalize_url};
