//! # HTTP Server
//!
//! Combines the client, admin and observability routers over one shared
//! state and serves them until a shutdown future resolves.

use std::future::Future;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::ListenerConfig;
use crate::loader::SnapshotLoader;
use crate::monitor::MetricsRegistry;
use crate::observability::{log_event, Event};
use crate::service::ClientDirectory;

use super::admin_routes::admin_routes;
use super::client_routes::client_routes;
use super::observability_routes::{health_routes, metrics_routes};

// ==================
// Shared State
// ==================

/// Handles shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub directory: Arc<ClientDirectory>,
    pub loader: Arc<SnapshotLoader>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(
        directory: Arc<ClientDirectory>,
        loader: Arc<SnapshotLoader>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            directory,
            loader,
            metrics,
        }
    }
}

// ==================
// Error Responses
// ==================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Handler error pair for a status code and message
pub(crate) fn error_response(
    code: u16,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: status.as_u16(),
        }),
    )
}

// ==================
// Server
// ==================

/// HTTP server for the client directory
pub struct HttpServer {
    config: ListenerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ListenerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(metrics_routes())
            .nest("/clients", client_routes())
            .nest("/admin", admin_routes())
            .with_state(state)
            .layer(cors)
    }

    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?.to_string();
        log_event(Event::Serving, &[("addr", &addr)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
