//! CLI argument definitions using clap
//!
//! Commands:
//! - clientdir serve [--config <path>] [--watch-dir <dir>] [--pattern <glob>] [--port <n>]
//! - clientdir inspect <file>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// clientdir - an in-memory client directory fed by snapshot files
#[derive(Parser, Debug)]
#[command(name = "clientdir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the newest snapshot, keep polling for new ones and serve HTTP
    Serve(ServeArgs),

    /// Parse a snapshot file and print a summary of its entries
    Inspect {
        /// Snapshot file to check
        file: PathBuf,
    },
}

/// Options for `serve`; flags override values from the config file
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory to watch for snapshot files
    #[arg(long)]
    pub watch_dir: Option<PathBuf>,

    /// Snapshot file name glob, e.g. "clients_*.json"
    #[arg(long)]
    pub pattern: Option<String>,

    /// HTTP port
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
