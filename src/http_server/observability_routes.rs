//! Observability HTTP Routes
//!
//! Health check and invocation metrics.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::monitor::MetricsSnapshot;

use super::server::{error_response, AppState, ErrorResponse};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache_size: usize,
}

/// Health check route
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// Metrics route
pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}

async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<ErrorResponse>)> {
    let cache_size = state
        .directory
        .index()
        .len()
        .map_err(|e| error_response(503, e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_size,
    }))
}

async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
