use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::api::types::*;
use crate::cancel::CancelToken;
use crate::engine::EngineState;
use crate::error::WikidexError;
use crate::models::SearchHit;

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Wikidex(WikidexError),
    Internal(String),
}

impl From<WikidexError> for ApiError {
    fn from(e: WikidexError) -> Self {
        ApiError::Wikidex(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Wikidex(e) => {
                let status = match &e {
                    WikidexError::NotReady | WikidexError::SearchCancelled => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    WikidexError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind(), e.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorResponse {
            error: error_type,
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Keyword search; the path remainder is the (percent-decoded) query
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    run_search(state, query).await
}

/// `/search/` with nothing after it: an empty query, answered like any other
pub async fn search_empty(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    run_search(state, String::new()).await
}

async fn run_search(
    state: Arc<AppState>,
    query: String,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let start = Instant::now();
    let engine = state.engine.clone();
    let cancel = CancelToken::with_timeout(state.search_timeout);

    let result = tokio::task::spawn_blocking(move || engine.search_hits(&query, &cancel))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_secs_f64();
    match result {
        Ok(hits) => {
            state.metrics.record_search(elapsed, hits.len());
            tracing::info!(hits = hits.len(), elapsed_ms = elapsed * 1000.0, "search found documents");
            Ok(Json(hits))
        }
        Err(e) => {
            state.metrics.record_search_error(e.kind(), elapsed);
            Err(e.into())
        }
    }
}

/// Health check; only a published index counts as healthy
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine_state = state.engine.state();
    let status = if engine_state == EngineState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: engine_state.as_str(),
            version: crate::VERSION,
            documents: state.engine.stats().map(|stats| stats.documents),
        }),
    )
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = state.metrics.registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return ApiError::Internal(e.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        buffer,
    )
        .into_response()
}
