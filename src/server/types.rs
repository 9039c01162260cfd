//! Server state and response bodies.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error_handling::StatsSnapshot;
use crate::pointer::PagePointer;

/// Shared state for the pointer service.
#[derive(Clone)]
pub struct ServerState {
    /// The page pointer service
    pub pointer: Arc<PagePointer>,
    /// When the server started
    pub start_time: Arc<Instant>,
}

impl ServerState {
    /// Wraps `pointer` with a fresh start time.
    pub fn new(pointer: Arc<PagePointer>) -> Self {
        ServerState {
            pointer,
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// Query string of `/preview`.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewParams {
    /// Page to preview
    pub url: Option<String>,
    /// Initial state of the import checkbox
    pub import_flag: Option<String>,
}

impl PreviewParams {
    /// Any non-empty value other than `0` or `false` checks the import box.
    pub fn import_checked(&self) -> bool {
        self.import_flag
            .as_deref()
            .map(str::trim)
            .is_some_and(|flag| !flag.is_empty() && flag != "0" && !flag.eq_ignore_ascii_case("false"))
    }
}

/// JSON response for `/status`
#[derive(Serialize)]
pub struct StatusResponse {
    /// Seconds since the server started
    pub uptime_seconds: f64,
    /// Errors recorded since start
    pub total_errors: usize,
    /// Warnings recorded since start
    pub total_warnings: usize,
    /// Informational events recorded since start
    pub total_info: usize,
    /// Non-zero counters by type
    pub counters: StatsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(flag: Option<&str>) -> PreviewParams {
        PreviewParams {
            url: None,
            import_flag: flag.map(str::to_string),
        }
    }

    #[test]
    fn test_import_checked() {
        assert!(params(Some("1")).import_checked());
        assert!(params(Some("checked")).import_checked());
        assert!(!params(Some("")).import_checked());
        assert!(!params(Some("0")).import_checked());
        assert!(!params(Some("FALSE")).import_checked());
        assert!(!params(None).import_checked());
    }
}
