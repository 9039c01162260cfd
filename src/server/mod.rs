//! HTTP service for pointer redirects and editor previews.
//!
//! Endpoints:
//! - `/posts/{id}` - 302 redirect to the post's pointer target, 404 otherwise
//! - `/preview?url=&import_flag=` - HTML preview fragment for the editor
//! - `/status` - JSON counters
//! - `/health` - liveness check
//!
//! While serving, expired cache entries are swept every
//! [`CACHE_PURGE_INTERVAL_SECS`](crate::config::CACHE_PURGE_INTERVAL_SECS).

mod handlers;
mod types;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;

use crate::config::CACHE_PURGE_INTERVAL_SECS;
use crate::pointer::PagePointer;

use handlers::{health_handler, post_handler, preview_handler, status_handler};
pub use types::{PreviewParams, ServerState, StatusResponse};

/// Builds the service router.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/posts/{id}", get(post_handler))
        .route("/preview", get(preview_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Sweeps expired cache entries every `period`, starting immediately.
pub fn spawn_cache_purge(pointer: Arc<PagePointer>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match pointer.purge_expired_cache().await {
                Ok(0) => {}
                Ok(n) => log::info!("Purged {n} expired cache entries"),
                Err(e) => log::warn!("Cache purge failed: {e:#}"),
            }
        }
    })
}

/// Serves the router on `127.0.0.1:port` until the process stops.
pub async fn start_server(port: u16, state: ServerState) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to port {port}: {e}"))?;

    log::info!("Page pointer listening on http://127.0.0.1:{port}/");
    log::info!("  - Redirects: http://127.0.0.1:{port}/posts/{{id}}");
    log::info!("  - Preview: http://127.0.0.1:{port}/preview?url=...");

    let purge = spawn_cache_purge(
        Arc::clone(&state.pointer),
        Duration::from_secs(CACHE_PURGE_INTERVAL_SECS),
    );
    let served = axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"));
    purge.abort();

    served
}
