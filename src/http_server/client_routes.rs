//! Client HTTP Routes
//!
//! Endpoints for client lookups and in-memory edits. Every handler is a
//! single facade call.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::client::{ClientId, ClientRecord};
use crate::service::ServiceError;

use super::server::{error_response, AppState, ErrorResponse};

type HandlerError = (StatusCode, Json<ErrorResponse>);

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ClientQuery {
    fn is_search(&self) -> bool {
        self.city.is_some() || self.name.is_some()
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

// ==================
// Client Routes
// ==================

/// Create client routes
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients_handler).post(create_client_handler))
        .route("/by-email/:email", get(get_client_by_email_handler))
        .route(
            "/:id",
            get(get_client_handler)
                .put(update_client_handler)
                .delete(delete_client_handler),
        )
}

// ==================
// Helper Functions
// ==================

fn service_error(e: ServiceError) -> HandlerError {
    error_response(e.status_code(), e.to_string())
}

fn not_found(what: String) -> HandlerError {
    error_response(404, format!("{} not found", what))
}

// ==================
// Handlers
// ==================

async fn list_clients_handler(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Vec<Arc<ClientRecord>>>, HandlerError> {
    let clients = if query.is_search() {
        state
            .directory
            .search(query.city.as_deref(), query.name.as_deref())
    } else {
        state.directory.list_all()
    };

    clients.map(Json).map_err(service_error)
}

async fn get_client_handler(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<Json<Arc<ClientRecord>>, HandlerError> {
    state
        .directory
        .get_by_id(id)
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Client {}", id)))
}

async fn get_client_by_email_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Arc<ClientRecord>>, HandlerError> {
    state
        .directory
        .get_by_email(Some(&email))
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Client with email '{}'", email)))
}

async fn create_client_handler(
    State(state): State<AppState>,
    Json(record): Json<ClientRecord>,
) -> Result<(StatusCode, Json<Arc<ClientRecord>>), HandlerError> {
    let created = state.directory.create(record).map_err(service_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_client_handler(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    Json(changes): Json<ClientRecord>,
) -> Result<Json<Arc<ClientRecord>>, HandlerError> {
    state
        .directory
        .update(id, changes)
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Client {}", id)))
}

async fn delete_client_handler(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<Json<DeleteResponse>, HandlerError> {
    let deleted = state.directory.delete(id).map_err(service_error)?;
    Ok(Json(DeleteResponse { deleted }))
}
