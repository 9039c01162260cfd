//! Utility functions.
//!
//! This module provides:
//! - CSS selector parsing with a safe fallback
//! - URL validation/normalization and file-name derivation

mod selector;
mod url;

pub use self::url::{file_name_from_url, validate_and_normalize_url};
pub use selector::parse_selector_with_fallback;
