//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (fetch, import, database, initialization)
//! - Processing statistics tracking (errors, warnings, info metrics)
//! - Mapping of typed errors onto statistics counters
//!
//! Error types are categorized into:
//! - **Errors**: Failed fetches and imports
//! - **Warnings**: Pages missing Open Graph fields the preview relies on
//! - **Info**: Informational metrics (cache hits, redirects, imports)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_fetch_error, categorize_import_error, update_fetch_error_stats,
    update_import_error_stats,
};
pub use stats::{ProcessingStats, StatsSnapshot};
pub use types::{
    DatabaseError, ErrorType, FetchError, ImportError, InfoType, InitializationError, SaveError,
    WarningType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for warning_type in WarningType::iter() {
            assert_eq!(stats.get_warning_count(warning_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::FetchTimeoutError);
        assert_eq!(stats.get_error_count(ErrorType::FetchTimeoutError), 1);

        stats.increment_warning(WarningType::MissingImage);
        assert_eq!(stats.get_warning_count(WarningType::MissingImage), 1);

        stats.increment_info(InfoType::CacheHit);
        assert_eq!(stats.get_info_count(InfoType::CacheHit), 1);
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::FetchStatusError);
        stats.increment_error(ErrorType::ImportNotAnImage);
        stats.increment_warning(WarningType::MissingTitle);
        stats.increment_info(InfoType::Redirect);

        assert_eq!(stats.total_errors(), 2);
        assert_eq!(stats.total_warnings(), 1);
        assert_eq!(stats.total_info(), 1);
    }

    #[test]
    fn test_snapshot_only_lists_non_zero_counters() {
        let stats = ProcessingStats::new();
        stats.increment_info(InfoType::CacheMiss);
        stats.increment_info(InfoType::CacheMiss);
        let snapshot = stats.snapshot();
        assert!(snapshot.errors.is_empty());
        assert!(snapshot.warnings.is_empty());
        assert_eq!(snapshot.info.get("CacheMiss"), Some(&2));
        assert_eq!(snapshot.info.len(), 1);
    }

    #[test]
    fn test_processing_stats_shared_across_threads() {
        let stats = std::sync::Arc::new(ProcessingStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = std::sync::Arc::clone(&stats);
                std::thread::spawn(move || stats.increment_info(InfoType::Redirect))
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }
        assert_eq!(stats.get_info_count(InfoType::Redirect), 8);
    }
}
