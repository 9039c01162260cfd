//! Pointer service HTTP handlers.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use log::{debug, error};

use super::types::{PreviewParams, ServerState, StatusResponse};
use crate::error_handling::InfoType;
use crate::pointer::render_error;

/// Redirects visitors of a pointer post to its target.
pub async fn post_handler(State(state): State<ServerState>, Path(post_id): Path<i64>) -> Response {
    match state.pointer.redirect_target(post_id).await {
        Ok(Some(target)) => {
            debug!("Redirecting post {post_id} to {target}");
            state.pointer.stats().increment_info(InfoType::Redirect);
            (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Failed to look up pointer for post {post_id}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Editor preview fragment for a URL.
pub async fn preview_handler(
    State(state): State<ServerState>,
    Query(params): Query<PreviewParams>,
) -> Response {
    let Some(url) = params.url.as_deref().filter(|url| !url.trim().is_empty()) else {
        return (StatusCode::OK, Html(String::new())).into_response();
    };
    let body = match state.pointer.preview(url).await {
        Ok(preview) => preview.render_html(params.import_checked()),
        Err(e) => render_error(&e.to_string()),
    };
    (StatusCode::OK, Html(body)).into_response()
}

/// Liveness check.
pub async fn health_handler() -> &'static str {
    "ok"
}

/// JSON counters for monitoring.
pub async fn status_handler(State(state): State<ServerState>) -> Response {
    let stats = state.pointer.stats();
    let response = StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        total_errors: stats.total_errors(),
        total_warnings: stats.total_warnings(),
        total_info: stats.total_info(),
        counters: stats.snapshot(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
