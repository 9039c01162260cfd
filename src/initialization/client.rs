//! HTTP client initialization.
//!
//! This module builds the shared `reqwest` client used for page previews and
//! image downloads.

use std::sync::Arc;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS};

/// Initializes the HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header and timeout from the configuration
/// - Redirect following (up to `MAX_REDIRECT_HOPS`)
/// - Certificate verification, unless `insecure_skip_tls_verify` is set
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    if config.insecure_skip_tls_verify {
        log::warn!("TLS certificate verification is disabled for outbound fetches");
    }

    let client = ClientBuilder::new()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
        .build()?;
    Ok(Arc::new(client))
}
