//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (cache lifetime, limits, default paths, meta keys)
//! - CLI option types and validation

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigValidationError, LogFormat, LogLevel};
