// GET handlers

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};

use super::AppState;
use crate::error::CollectError;
use crate::models::Snapshot;

/// Why a request could not obtain a snapshot.
enum SnapshotFailure {
    Collect(CollectError),
    Deadline(Duration),
}

impl std::fmt::Display for SnapshotFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotFailure::Collect(e) => write!(f, "{}", e),
            SnapshotFailure::Deadline(d) => write!(f, "request deadline of {:?} exceeded", d),
        }
    }
}

impl IntoResponse for SnapshotFailure {
    fn into_response(self) -> Response {
        match self {
            SnapshotFailure::Collect(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to collect metrics").into_response()
            }
            SnapshotFailure::Deadline(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "Timed out collecting metrics").into_response()
            }
        }
    }
}

/// Collect under the request deadline. Dropping the pass on timeout cancels its upstream calls.
async fn snapshot(state: &AppState) -> Result<Arc<Snapshot>, SnapshotFailure> {
    let deadline = state.config.request_timeout();
    match tokio::time::timeout(deadline, state.collector.collect()).await {
        Ok(Ok(snapshot)) => Ok(snapshot),
        Ok(Err(e)) => {
            tracing::error!(error = %e, upstream = %e.upstream(), "Error collecting metrics");
            Err(SnapshotFailure::Collect(e))
        }
        Err(_) => {
            tracing::warn!(deadline_secs = deadline.as_secs(), "metrics collection timed out");
            Err(SnapshotFailure::Deadline(deadline))
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn render_error(e: tera::Error) -> Response {
    tracing::error!(error = %e, "Error rendering template");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

/// GET /: dashboard page.
pub(super) async fn index_handler(State(state): State<AppState>) -> Response {
    let refresh_secs = state.config.cache.ttl_secs.max(5);
    match state.templates.index(refresh_secs) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// GET /metrics/json: current snapshot.
pub(super) async fn metrics_json_handler(State(state): State<AppState>) -> Response {
    match snapshot(&state).await {
        Ok(s) => Json(s.as_ref()).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// GET /metrics/html: snapshot as an HTML fragment.
pub(super) async fn metrics_html_handler(State(state): State<AppState>) -> Response {
    let s = match snapshot(&state).await {
        Ok(s) => s,
        Err(failure) => return failure.into_response(),
    };
    match state.templates.metrics(&s) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// GET /healthz: process liveness; never touches upstreams.
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": now_rfc3339(),
    }))
}

/// GET /readiness: ready only while a snapshot can be produced.
pub(super) async fn readiness_handler(State(state): State<AppState>) -> Response {
    match snapshot(&state).await {
        Ok(_) => Json(serde_json::json!({
            "status": "ready",
            "timestamp": now_rfc3339(),
        }))
        .into_response(),
        Err(failure) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not ready",
                "error": failure.to_string(),
            })),
        )
            .into_response(),
    }
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
