use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::engine::SearchEngine;
use crate::metrics::SearchMetrics;

use super::handlers::*;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub metrics: Arc<SearchMetrics>,
    /// Deadline applied to every query
    pub search_timeout: Duration,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Search: the rest of the path is the query text
        .route("/search/", get(search_empty))
        .route("/search/*query", get(search))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
