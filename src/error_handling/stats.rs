//! Processing statistics tracking.
//!
//! This module provides thread-safe counters for errors, warnings, and
//! informational metrics while serving previews, redirects and imports.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// One atomic counter per variant of `K`, all created up front.
#[derive(Debug)]
struct Counters<K> {
    counts: HashMap<K, AtomicUsize>,
}

impl<K> Counters<K>
where
    K: IntoEnumIterator + Copy + Eq + Hash + Debug,
{
    fn new() -> Self {
        Counters {
            counts: K::iter().map(|key| (key, AtomicUsize::new(0))).collect(),
        }
    }

    fn increment(&self, key: K) {
        match self.counts.get(&key) {
            Some(counter) => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            None => log::error!("No counter registered for {key:?}"),
        }
    }

    fn get(&self, key: K) -> usize {
        self.counts
            .get(&key)
            .map(|counter| counter.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    fn total(&self) -> usize {
        K::iter().map(|key| self.get(key)).sum()
    }

    fn non_zero(&self) -> BTreeMap<String, usize> {
        K::iter()
            .map(|key| (format!("{key:?}"), self.get(key)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Thread-safe processing statistics tracker.
///
/// # Categories
///
/// - **Errors**: Failed fetches and image imports
/// - **Warnings**: Pages missing Open Graph fields the preview relies on
/// - **Info**: Cache hits/misses, redirects and completed imports
///
/// Share it across tasks with `Arc`.
#[derive(Debug)]
pub struct ProcessingStats {
    errors: Counters<ErrorType>,
    warnings: Counters<WarningType>,
    info: Counters<InfoType>,
}

/// Point-in-time copy of the non-zero counters, for the status endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Error counts by type name
    pub errors: BTreeMap<String, usize>,
    /// Warning counts by type name
    pub warnings: BTreeMap<String, usize>,
    /// Informational counts by type name
    pub info: BTreeMap<String, usize>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        ProcessingStats {
            errors: Counters::new(),
            warnings: Counters::new(),
            info: Counters::new(),
        }
    }

    /// Records one error of the given type.
    pub fn increment_error(&self, error: ErrorType) {
        self.errors.increment(error);
    }

    /// Records one warning of the given type.
    pub fn increment_warning(&self, warning: WarningType) {
        self.warnings.increment(warning);
    }

    /// Records one informational event of the given type.
    pub fn increment_info(&self, info_type: InfoType) {
        self.info.increment(info_type);
    }

    /// Current count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors.get(error)
    }

    /// Current count for a warning type.
    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings.get(warning)
    }

    /// Current count for an informational type.
    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info.get(info_type)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        self.errors.total()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        self.warnings.total()
    }

    /// Get total info count across all info types.
    pub fn total_info(&self) -> usize {
        self.info.total()
    }

    /// Copies the counters that are currently above zero.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            errors: self.errors.non_zero(),
            warnings: self.warnings.non_zero(),
            info: self.info.non_zero(),
        }
    }
}
