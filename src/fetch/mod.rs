//! Page and image retrieval.
//!
//! This module provides:
//! - [`HttpFetch`], the HTTP collaborator, and its `reqwest` implementation
//! - [`TransientCache`], a time-bounded key/value store, with an in-memory backend
//! - [`CachedFetcher`], read-through caching of fetched pages

mod cache;
mod cached;
mod http;

pub use cache::{transient_key, MemoryCache, TransientCache};
pub use cached::{CachedFetcher, CachedPage};
pub use http::{HttpFetch, HttpResponse, PageFetcher};
