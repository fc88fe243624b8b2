//! CLI command implementations
//!
//! `serve` boots in a fixed order: configuration, index, initial snapshot
//! load, poller, HTTP listener. A failed initial load is not fatal; the
//! service starts with an empty index and the poller retries.

use std::fs;
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::signal;
use tokio::sync::watch;

use crate::client::{parse_snapshot, SnapshotSummary};
use crate::config::ServiceConfig;
use crate::http_server::{AppState, HttpServer};
use crate::index::ClientIndex;
use crate::loader::SnapshotLoader;
use crate::monitor::{InvocationMonitor, MetricsRegistry};
use crate::observability::{log_event, Event, Logger};
use crate::service::ClientDirectory;

use super::args::{Command, ServeArgs};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Inspect { file } => inspect(&file),
    }
}

/// Build the effective configuration: file (or defaults), then flags.
pub fn resolve_config(args: &ServeArgs) -> CliResult<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(dir) = &args.watch_dir {
        config.watch_dir = dir.clone();
    }
    if let Some(pattern) = &args.pattern {
        config.file_pattern = pattern.clone();
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    config.validate()?;
    Ok(config)
}

/// Boot the directory and serve until SIGINT/SIGTERM
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    log_event(Event::BootStart, &[]);

    let config = resolve_config(args)?;
    log_event(
        Event::ConfigLoaded,
        &[
            ("addr", &config.http.bind_addr()),
            ("initial_delay_ms", &config.initial_delay_ms.to_string()),
            ("path", &config.watch_dir.display().to_string()),
            ("pattern", &config.file_pattern),
            ("poll_interval_ms", &config.poll_interval_ms.to_string()),
        ],
    );

    let index = Arc::new(ClientIndex::new());
    let metrics = Arc::new(MetricsRegistry::new());
    let loader = Arc::new(SnapshotLoader::new(config.loader_config()?, Arc::clone(&index)));
    let directory = Arc::new(ClientDirectory::new(
        index,
        InvocationMonitor::new(metrics.clone()),
    ));

    // Failures are logged by the loader; boot continues with what the
    // index holds.
    let _ = loader.initialize();

    let rt = tokio::runtime::Runtime::new()
        .map_err(CliError::Runtime)?;

    let server = HttpServer::new(
        config.http.clone(),
        AppState::new(directory, Arc::clone(&loader), metrics),
    );
    rt.block_on(run_until_shutdown(server, loader))
}

async fn run_until_shutdown(server: HttpServer, loader: Arc<SnapshotLoader>) -> CliResult<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cache_size = loader.index().len().unwrap_or_default().to_string();
    let poller = tokio::spawn(loader.run(shutdown_rx));

    log_event(Event::BootComplete, &[("cache_size", &cache_size)]);
    let served = server.start(shutdown_signal()).await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        Logger::error(Event::PollerStop.as_str(), &[("cause", &e.to_string())]);
    }
    log_event(Event::ShutdownComplete, &[]);

    served.map_err(CliError::Serve)
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = wait_for_signal(signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => park_after_failure(&e).await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    log_event(Event::ShutdownStart, &[("signal", signal_name)]);
}

/// Resolves when `delivery` does. A handler that cannot be installed
/// never resolves, so it cannot trigger shutdown.
async fn wait_for_signal<F>(delivery: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = delivery.await {
        park_after_failure(&e).await;
    }
}

async fn park_after_failure(cause: &io::Error) {
    Logger::error(Event::ShutdownStart.as_str(), &[("cause", &cause.to_string())]);
    std::future::pending::<()>().await
}

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    file: &'a str,
    #[serde(flatten)]
    summary: SnapshotSummary,
    indexable: usize,
}

/// Parse a snapshot file and print its summary as JSON
pub fn inspect(file: &Path) -> CliResult<()> {
    println!("{}", inspect_report(file)?);
    Ok(())
}

fn inspect_report(file: &Path) -> CliResult<String> {
    let bytes = fs::read(file).map_err(|source| CliError::ReadSnapshot {
        path: file.to_path_buf(),
        source,
    })?;
    let records = parse_snapshot(&bytes).map_err(|source| CliError::InvalidSnapshot {
        path: file.to_path_buf(),
        source,
    })?;

    let summary = SnapshotSummary::of(&records);
    let file_name = file.display().to_string();
    let report = InspectReport {
        file: &file_name,
        summary,
        indexable: summary.indexable(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
