//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error creating a working directory (uploads, database parent).
    #[error("Directory initialization error for {path}: {source}")]
    DirectoryError {
        /// Directory that could not be created
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Errors returned when retrieving a page or image over HTTP.
///
/// Each variant is distinguishable so the editor can be shown why a preview
/// is missing.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Too many redirects or a redirect loop.
    #[error("Redirect error: {0}")]
    Redirect(String),

    /// The response body could not be read or decoded.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The response body exceeded the configured limit.
    #[error("Response body too large ({size} bytes, limit {limit})")]
    TooLarge {
        /// Reported or observed body size
        size: usize,
        /// Maximum accepted size
        limit: usize,
    },

    /// Any other request failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// Reading a local document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReqwestError> for FetchError {
    fn from(error: ReqwestError) -> Self {
        if let Some(status) = error.status() {
            return FetchError::Status(status.as_u16());
        }
        if error.is_builder() {
            FetchError::InvalidUrl(error.to_string())
        } else if error.is_timeout() {
            FetchError::Timeout(error.to_string())
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if error.is_redirect() {
            FetchError::Redirect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}

/// Errors raised while importing a remote image as a featured image.
///
/// An import failure never prevents the post's pointer from being saved.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The image URL does not name a file with an image MIME type.
    #[error("{file_name} is not a valid image. {mime}")]
    NotAnImage {
        /// File name derived from the image URL
        file_name: String,
        /// MIME type guessed from the file name (empty if unknown)
        mime: String,
    },

    /// Downloading the image failed.
    #[error("Failed to download image: {0}")]
    Download(#[from] FetchError),

    /// Writing the image to the uploads directory failed.
    #[error("The file cannot be saved: {0}")]
    Write(#[from] std::io::Error),

    /// Recording the attachment failed.
    #[error("Failed to save record into database: {0}")]
    Database(#[from] DatabaseError),
}

/// Errors that prevent a pointer from being saved.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The target is not an http(s) URL.
    #[error("Invalid pointer URL: {0}")]
    InvalidUrl(String),

    /// Storing the pointer failed.
    #[error("Failed to save pointer: {0}")]
    Database(#[from] DatabaseError),
}

/// Types of errors that can occur while serving previews and imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// URL rejected before fetching
    FetchInvalidUrl,
    /// Non-success HTTP status
    FetchStatusError,
    /// Request timed out
    FetchTimeoutError,
    /// Connection could not be established
    FetchConnectError,
    /// Too many redirects
    FetchRedirectError,
    /// Body could not be read
    FetchBodyError,
    /// Body exceeded the size limit
    FetchTooLarge,
    /// Any other request failure
    FetchOtherError,
    /// Downloaded file is not an image
    ImportNotAnImage,
    /// Image download failed
    ImportDownloadError,
    /// Image could not be written to the uploads directory
    ImportWriteError,
    /// Attachment or thumbnail could not be stored
    ImportDatabaseError,
    /// Transient cache read or write failed
    CacheError,
}

/// Types of warnings about incomplete Open Graph data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
#[allow(clippy::enum_variant_names)] // All variants start with "Missing" by design
pub enum WarningType {
    /// Page parsed but carries no og:* properties
    MissingOpenGraph,
    /// No og:title
    MissingTitle,
    /// No og:image
    MissingImage,
    /// No og:site_name
    MissingSiteName,
}

/// Types of informational metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// Page served from the transient cache
    CacheHit,
    /// Page fetched from the network
    CacheMiss,
    /// Visitor redirected to a pointer target
    Redirect,
    /// Image imported as featured image
    ImageImported,
    /// Import skipped, image already featured
    ImageAlreadyImported,
}
