//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - HTTP client (timeouts, user agent, TLS policy)
//! - Working directories
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::path::Path;

use crate::error_handling::InitializationError;

// Re-export public API
pub use client::init_client;
pub use logger::{init_logger, init_logger_with};

/// Creates `dir` and its parents if they do not exist yet.
///
/// # Errors
///
/// Returns `InitializationError::DirectoryError` if the directory cannot be created.
pub fn init_directory(dir: &Path) -> Result<(), InitializationError> {
    std::fs::create_dir_all(dir).map_err(|source| InitializationError::DirectoryError {
        path: dir.display().to_string(),
        source,
    })
}
