//! # HTTP Server Module
//!
//! JSON-over-HTTP transport for the client directory. Handlers only
//! translate requests into facade and loader calls.
//!
//! # Endpoints
//!
//! - `/clients` - Client lookups and in-memory edits
//! - `/admin/*` - Snapshot reload and status
//! - `/health` - Liveness and cache size
//! - `/metrics` - Invocation metrics

pub mod admin_routes;
pub mod client_routes;
pub mod observability_routes;
pub mod server;

pub use server::{AppState, ErrorResponse, HttpServer};
