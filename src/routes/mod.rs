// HTTP routes: dashboard page, snapshot JSON/HTML, health and readiness

mod http;
mod render;

pub use render::Templates;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::collector::MetricsCollector;
use crate::config::AppConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) collector: Arc<MetricsCollector>,
    pub(crate) templates: Arc<Templates>,
    pub(crate) config: AppConfig,
}

pub fn app(
    collector: Arc<MetricsCollector>,
    templates: Arc<Templates>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        collector,
        templates,
        config,
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/metrics/json", get(http::metrics_json_handler)) // GET /metrics/json
        .route("/metrics/html", get(http::metrics_html_handler)) // GET /metrics/html
        .route("/healthz", get(http::health_handler)) // GET /healthz
        .route("/readiness", get(http::readiness_handler)) // GET /readiness
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
