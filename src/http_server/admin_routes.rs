//! Admin HTTP Routes
//!
//! Operator endpoints for the snapshot loader.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::loader::{AppliedSnapshot, LoaderError, PollOutcome, SnapshotStatus};

use super::server::{error_response, AppState, ErrorResponse};

type HandlerError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// "applied", "unchanged" or "no_candidate"
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<AppliedSnapshot>,
    pub cache_size: usize,
}

#[derive(Debug, Serialize)]
pub struct SnapshotStatusResponse {
    pub status: SnapshotStatus,
    pub summary: String,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/reload", post(reload_handler))
        .route("/snapshot", get(snapshot_status_handler))
}

fn loader_error(e: LoaderError) -> HandlerError {
    error_response(e.status_code(), e.to_string())
}

async fn reload_handler(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, HandlerError> {
    let outcome = state.loader.reload().await.map_err(loader_error)?;
    let cache_size = state
        .loader
        .index()
        .len()
        .map_err(|e| loader_error(e.into()))?;

    let (outcome, snapshot) = match outcome {
        PollOutcome::Applied(applied) => ("applied", Some(applied)),
        PollOutcome::Unchanged => ("unchanged", None),
        PollOutcome::NoCandidate => ("no_candidate", None),
    };

    Ok(Json(ReloadResponse {
        outcome,
        snapshot,
        cache_size,
    }))
}

async fn snapshot_status_handler(State(state): State<AppState>) -> Json<SnapshotStatusResponse> {
    let status = state.loader.status();
    Json(SnapshotStatusResponse {
        summary: status.to_string(),
        status,
    })
}
