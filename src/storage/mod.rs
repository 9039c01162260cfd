//! Database operations.
//!
//! This module provides:
//! - Connection pool setup and schema migrations
//! - Post meta storage (pointer URL, import flag, featured image)
//! - Attachment records for imported images
//! - The SQLite transient cache backend

mod attachments;
mod migrations;
mod pool;
mod posts;
mod transients;

// Re-export public API
pub use attachments::{
    get_attachment, insert_attachment, list_for_post, AttachmentRecord, NewAttachment,
};
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, init_memory_pool};
pub use posts::{PostStore, META_THUMBNAIL_ID};
pub use transients::SqliteCache;
