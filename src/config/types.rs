//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    DB_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, TRANSIENT_TTL_SECS, UPLOADS_DIR,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Runtime configuration shared by the library and the CLI.
///
/// Can be built programmatically via `Default`, or parsed from flags when
/// flattened into the binary's argument parser.
///
/// # Examples
///
/// ```no_run
/// use page_pointer::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("./blog.db"),
///     timeout_seconds: 10,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Database path (SQLite file) holding pointers, attachments and cached fetches
    #[arg(long, value_parser, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Directory receiving imported featured images
    #[arg(long, value_parser, default_value = UPLOADS_DIR, global = true)]
    pub uploads_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Accept invalid TLS certificates when fetching pages and images.
    ///
    /// Off by default. Only enable for hosts you trust.
    #[arg(long, default_value_t = false, global = true)]
    pub insecure_skip_tls_verify: bool,

    /// Lifetime of cached page fetches in seconds
    #[arg(long, default_value_t = TRANSIENT_TTL_SECS, global = true)]
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            uploads_dir: PathBuf::from(UPLOADS_DIR),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insecure_skip_tls_verify: false,
            cache_ttl_secs: TRANSIENT_TTL_SECS,
        }
    }
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and how to fix it
    pub message: String,
}

impl Config {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "timeout_seconds",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigValidationError {
                field: "cache_ttl_secs",
                message: "must be greater than 0 (use a short TTL instead of disabling the cache)"
                    .to_string(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "user_agent",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Cache lifetime as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.cache_ttl_secs, 3600);
        assert!(!config.insecure_skip_tls_verify);
        assert_eq!(config.db_path, PathBuf::from("./page_pointer.db"));
        assert_eq!(config.uploads_dir, PathBuf::from("./uploads"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().expect_err("zero timeout must fail");
        assert_eq!(err.field, "timeout_seconds");
        assert!(err.message.contains("greater than 0"));
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let config = Config {
            cache_ttl_secs: 0,
            ..Default::default()
        };
        let err = config.validate().expect_err("zero ttl must fail");
        assert_eq!(err.field, "cache_ttl_secs");
    }

    #[test]
    fn test_validate_rejects_blank_user_agent() {
        let config = Config {
            user_agent: "   ".to_string(),
            ..Default::default()
        };
        let err = config.validate().expect_err("blank user agent must fail");
        assert_eq!(err.field, "user_agent");
        assert_eq!(
            err.to_string(),
            "Invalid value for user_agent: must not be empty"
        );
    }
}
