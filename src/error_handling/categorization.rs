//! Error categorization.
//!
//! Maps typed errors onto the counters tracked by [`ProcessingStats`].

use super::stats::ProcessingStats;
use super::types::{ErrorType, FetchError, ImportError};

/// Categorizes a `FetchError` into an `ErrorType`.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::InvalidUrl(_) => ErrorType::FetchInvalidUrl,
        FetchError::Status(_) => ErrorType::FetchStatusError,
        FetchError::Timeout(_) => ErrorType::FetchTimeoutError,
        FetchError::Connect(_) => ErrorType::FetchConnectError,
        FetchError::Redirect(_) => ErrorType::FetchRedirectError,
        FetchError::Body(_) => ErrorType::FetchBodyError,
        FetchError::TooLarge { .. } => ErrorType::FetchTooLarge,
        FetchError::Request(_) | FetchError::Io(_) => ErrorType::FetchOtherError,
    }
}

/// Categorizes an `ImportError` into an `ErrorType`.
pub fn categorize_import_error(error: &ImportError) -> ErrorType {
    match error {
        ImportError::NotAnImage { .. } => ErrorType::ImportNotAnImage,
        ImportError::Download(_) => ErrorType::ImportDownloadError,
        ImportError::Write(_) => ErrorType::ImportWriteError,
        ImportError::Database(_) => ErrorType::ImportDatabaseError,
    }
}

/// Records a fetch failure in the statistics.
pub fn update_fetch_error_stats(stats: &ProcessingStats, error: &FetchError) {
    stats.increment_error(categorize_fetch_error(error));
}

/// Records an import failure in the statistics.
pub fn update_import_error_stats(stats: &ProcessingStats, error: &ImportError) {
    stats.increment_error(categorize_import_error(error));
}
