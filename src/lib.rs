//! clientdir - an in-memory client directory refreshed from JSON snapshot drops
//!
//! An upstream pipeline periodically writes a complete snapshot of all
//! clients into a directory. The snapshot loader polls that directory,
//! swaps the newest file into the client index, and the request facade
//! serves lookups and best-effort in-memory edits over HTTP.

pub mod cli;
pub mod client;
pub mod config;
pub mod http_server;
pub mod index;
pub mod loader;
pub mod monitor;
pub mod observability;
pub mod service;
