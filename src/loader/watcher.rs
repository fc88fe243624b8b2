//! Snapshot directory watcher
//!
//! Polls the watched directory, picks the newest file matching the
//! pattern, and swaps its contents into the index when it differs from
//! the last applied file.
//!
//! ```text
//! IDLE -> SCANNING -> IDLE                          (no newer file)
//! IDLE -> SCANNING -> LOADING -> APPLIED -> IDLE    (new file parsed)
//! IDLE -> SCANNING -> LOADING -> IDLE               (read/parse failure, retried next poll)
//! ```
//!
//! File reads and JSON parsing happen without touching the index lock;
//! only the final swap in `ClientIndex::bulk_replace` takes it.
//!
//! Manual edits made through the request facade are not merged: the next
//! applied snapshot replaces them wholesale.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::client::parse_snapshot;
use crate::index::ClientIndex;
use crate::observability::{log_event, Event, Logger};

use super::errors::{LoaderError, LoaderResult};
use super::pattern::FilePattern;
use super::status::{AppliedSnapshot, PollOutcome, SnapshotCandidate, SnapshotStatus};

/// Snapshot loader settings
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory the pipeline drops snapshot files into
    pub watch_dir: PathBuf,
    /// File name pattern of snapshot files
    pub pattern: FilePattern,
    /// Delay between the end of one poll and the start of the next
    pub poll_interval: Duration,
    /// Delay before the first scheduled poll
    pub initial_delay: Duration,
}

/// Periodic snapshot loader
#[derive(Debug)]
pub struct SnapshotLoader {
    config: LoaderConfig,
    index: Arc<ClientIndex>,
    /// Serializes scan-and-load cycles (scheduled poll vs. force reload)
    cycle: Mutex<()>,
    last_applied: RwLock<Option<AppliedSnapshot>>,
}

impl SnapshotLoader {
    pub fn new(config: LoaderConfig, index: Arc<ClientIndex>) -> Self {
        Self {
            config,
            index,
            cycle: Mutex::new(()),
            last_applied: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<ClientIndex> {
        &self.index
    }

    /// Startup step: make sure the watched directory exists, then load the
    /// newest matching file unconditionally.
    ///
    /// Failures are logged and returned; the caller is expected to keep
    /// running with whatever the index holds (empty at startup).
    pub fn initialize(&self) -> LoaderResult<PollOutcome> {
        let dir = &self.config.watch_dir;
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            if let Err(source) = fs::create_dir_all(dir) {
                log_event(
                    Event::DirectoryUnavailable,
                    &[("path", &dir_str), ("cause", &source.to_string())],
                );
                return Err(LoaderError::DirectoryUnavailable {
                    path: dir.clone(),
                    source,
                });
            }
            log_event(Event::DirectoryCreated, &[("path", &dir_str)]);
        }

        self.scan_and_load()
    }

    /// One scheduled poll: load the newest file only if it is not the one
    /// already applied.
    pub fn poll_once(&self) -> LoaderResult<PollOutcome> {
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(candidate) = self.scan_or_idle()? else {
            return Ok(PollOutcome::NoCandidate);
        };

        if let Some(applied) = self.applied() {
            if candidate.is_same_file(&applied) {
                return Ok(PollOutcome::Unchanged);
            }
        }

        log_event(
            Event::SnapshotDetected,
            &[("file", &candidate.file_name)],
        );
        self.load(candidate)
    }

    /// Re-run scan-and-load outside the schedule, re-reading the newest
    /// file even when it is the one already applied.
    pub fn force_reload(&self) -> LoaderResult<PollOutcome> {
        log_event(Event::ForceReload, &[]);
        self.scan_and_load()
    }

    /// Load the newest candidate without comparing it to the applied one
    fn scan_and_load(&self) -> LoaderResult<PollOutcome> {
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);

        match self.scan_or_idle()? {
            Some(candidate) => self.load(candidate),
            None => Ok(PollOutcome::NoCandidate),
        }
    }

    /// What the index currently reflects
    pub fn status(&self) -> SnapshotStatus {
        match self.applied() {
            Some(applied) => SnapshotStatus::Loaded(applied),
            None => SnapshotStatus::NothingLoaded,
        }
    }

    fn applied(&self) -> Option<AppliedSnapshot> {
        // The slot is only ever overwritten whole, so a poisoned value is
        // still a complete snapshot description.
        self.last_applied
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Find the newest file whose name matches the pattern.
    ///
    /// Entries that vanish or cannot be stat'ed mid-scan are skipped. Ties
    /// on modification time go to the lexically greatest name.
    pub fn scan(&self) -> LoaderResult<Option<SnapshotCandidate>> {
        let dir = &self.config.watch_dir;
        log_event(Event::SnapshotScan, &[("path", &dir.display().to_string())]);

        let entries = fs::read_dir(dir).map_err(|source| LoaderError::DirectoryUnavailable {
            path: dir.clone(),
            source,
        })?;

        let newest = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                if !self.config.pattern.matches(&file_name) {
                    return None;
                }
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let modified: DateTime<Utc> = metadata.modified().ok()?.into();
                Some(SnapshotCandidate {
                    path: entry.path(),
                    file_name,
                    size_bytes: metadata.len(),
                    modified,
                })
            })
            .max_by(|a, b| {
                a.modified
                    .cmp(&b.modified)
                    .then_with(|| a.file_name.cmp(&b.file_name))
            });

        Ok(newest)
    }

    /// Scan, treating an unavailable directory as "nothing to do"
    fn scan_or_idle(&self) -> LoaderResult<Option<SnapshotCandidate>> {
        match self.scan() {
            Ok(Some(candidate)) => Ok(Some(candidate)),
            Ok(None) => {
                log_event(
                    Event::SnapshotNotFound,
                    &[("pattern", self.config.pattern.as_str())],
                );
                Ok(None)
            }
            Err(LoaderError::DirectoryUnavailable { path, source }) => {
                // The directory may appear later; keep polling.
                log_event(
                    Event::DirectoryUnavailable,
                    &[
                        ("path", &path.display().to_string()),
                        ("cause", &source.to_string()),
                    ],
                );
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Read, parse and apply one candidate
    fn load(&self, candidate: SnapshotCandidate) -> LoaderResult<PollOutcome> {
        let result = fs::read(&candidate.path)
            .map_err(|source| LoaderError::Io {
                path: candidate.path.clone(),
                source,
            })
            .and_then(|bytes| {
                parse_snapshot(&bytes).map_err(|source| LoaderError::Parse {
                    path: candidate.path.clone(),
                    source,
                })
            })
            .and_then(|records| self.index.bulk_replace(records).map_err(LoaderError::from));

        let reload = match result {
            Ok(reload) => reload,
            Err(err) => {
                log_event(
                    Event::SnapshotFailed,
                    &[
                        ("file", &candidate.file_name),
                        ("cause", &err.to_string()),
                    ],
                );
                return Err(err);
            }
        };

        let applied = AppliedSnapshot::new(candidate, reload);
        log_event(
            Event::SnapshotApplied,
            &[
                ("file", &applied.file_name),
                ("records", &reload.loaded.to_string()),
                ("skipped_without_id", &reload.skipped_without_id.to_string()),
            ],
        );

        *self
            .last_applied
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(applied.clone());

        Ok(PollOutcome::Applied(applied))
    }

    /// `poll_once` on the blocking pool
    pub async fn poll(self: &Arc<Self>) -> LoaderResult<PollOutcome> {
        let loader = Arc::clone(self);
        tokio::task::spawn_blocking(move || loader.poll_once())
            .await
            .map_err(|e| LoaderError::TaskFailed(e.to_string()))?
    }

    /// `force_reload` on the blocking pool
    pub async fn reload(self: &Arc<Self>) -> LoaderResult<PollOutcome> {
        let loader = Arc::clone(self);
        tokio::task::spawn_blocking(move || loader.force_reload())
            .await
            .map_err(|e| LoaderError::TaskFailed(e.to_string()))?
    }

    /// Scheduled polling until `shutdown` flips to true or its sender is
    /// dropped.
    ///
    /// Waits `initial_delay`, then polls every `poll_interval`. A slow poll
    /// pushes the next one back rather than bunching ticks up.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let interval_ms = self.config.poll_interval.as_millis().to_string();
        log_event(
            Event::PollerStart,
            &[
                ("interval_ms", &interval_ms),
                ("path", &self.config.watch_dir.display().to_string()),
                ("pattern", self.config.pattern.as_str()),
            ],
        );

        tokio::select! {
            _ = tokio::time::sleep(self.config.initial_delay) => {}
            _ = shutdown.changed() => {
                log_event(Event::PollerStop, &[]);
                return;
            }
        }

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Read/parse failures are logged by the loader itself.
                    if let Err(LoaderError::TaskFailed(cause)) = self.poll().await {
                        Logger::error(
                            Event::SnapshotFailed.as_str(),
                            &[("cause", &cause)],
                        );
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        log_event(Event::PollerStop, &[]);
    }
}
