//! CLI module for clientdir
//!
//! Provides command-line interface for:
//! - serve: Boot the index, snapshot poller and HTTP server
//! - inspect: One-shot snapshot file check

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{inspect, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
