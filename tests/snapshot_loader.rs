//! Snapshot Loader Tests
//!
//! Test Categories:
//! 1. Staleness: the newest file wins and status follows it
//! 2. Failure isolation: a bad file leaves the previous snapshot in place
//! 3. Reload semantics: manual edits do not survive a reload
//! 4. Scheduled polling picks up new drops

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use clientdir::client::ClientRecord;
use clientdir::index::ClientIndex;
use clientdir::loader::{
    FilePattern, LoaderConfig, LoaderError, PollOutcome, SnapshotLoader, SnapshotStatus,
};
use clientdir::monitor::InvocationMonitor;
use clientdir::service::ClientDirectory;
use tokio::sync::watch;

fn loader_for(dir: &Path) -> SnapshotLoader {
    let config = LoaderConfig {
        watch_dir: dir.to_path_buf(),
        pattern: FilePattern::new("clients_*.json").unwrap(),
        poll_interval: Duration::from_millis(40),
        initial_delay: Duration::from_millis(0),
    };
    SnapshotLoader::new(config, Arc::new(ClientIndex::new()))
}

/// Write `body` to `dir/name` with a modification time `age_secs` ago
fn drop_file(dir: &Path, name: &str, body: &str, age_secs: u64) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
}

const SNAPSHOT_A: &str = r#"[
    {"id": 1, "nom": "Dupont", "prenom": "Marie", "email": "marie@x.com", "ville": "Paris"},
    {"id": 2, "nom": "Durand", "email": "paul@x.com", "ville": "Lyon"}
]"#;

const SNAPSHOT_B: &str = r#"[
    {"id": 2, "name": "Durand", "email": "paul@x.com", "city": "Lyon"},
    {"id": 3, "name": "Martin", "email": "lea@x.com", "city": "Nantes"}
]"#;

// =============================================================================
// STALENESS
// =============================================================================

/// Test: After A then a newer B, the index reflects exactly B and status
/// reports B.
#[test]
fn test_newer_file_replaces_older() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_a.json", SNAPSHOT_A, 120);
    let loader = loader_for(dir.path());

    assert!(matches!(loader.initialize().unwrap(), PollOutcome::Applied(_)));
    assert_eq!(loader.status().applied().unwrap().file_name, "clients_a.json");

    drop_file(dir.path(), "clients_b.json", SNAPSHOT_B, 10);
    let PollOutcome::Applied(applied) = loader.poll_once().unwrap() else {
        panic!("expected B to be applied");
    };
    assert_eq!(applied.file_name, "clients_b.json");
    assert_eq!(applied.reload.loaded, 2);

    let index = loader.index();
    assert!(index.get_by_id(1).unwrap().is_none());
    assert!(index.get_by_email(Some("marie@x.com")).unwrap().is_none());
    assert_eq!(index.get_by_id(3).unwrap().unwrap().city.as_deref(), Some("Nantes"));
    assert_eq!(index.len().unwrap(), 2);

    let status = loader.status();
    assert_eq!(status.applied().unwrap().file_name, "clients_b.json");
    assert!(status.to_string().starts_with("File: clients_b.json, Size: "));
}

/// Test: An older file appearing later is not applied.
#[test]
fn test_older_drop_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_b.json", SNAPSHOT_B, 10);
    let loader = loader_for(dir.path());
    loader.poll_once().unwrap();

    drop_file(dir.path(), "clients_a.json", SNAPSHOT_A, 300);

    assert_eq!(loader.poll_once().unwrap(), PollOutcome::Unchanged);
    assert!(loader.index().get_by_id(1).unwrap().is_none());
}

/// Test: Rewriting the applied file in place makes it a new candidate.
#[test]
fn test_rewritten_file_is_reapplied() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_1.json", SNAPSHOT_A, 60);
    let loader = loader_for(dir.path());
    loader.poll_once().unwrap();

    drop_file(dir.path(), "clients_1.json", SNAPSHOT_B, 5);

    assert!(matches!(loader.poll_once().unwrap(), PollOutcome::Applied(_)));
    assert!(loader.index().get_by_id(3).unwrap().is_some());
}

/// Test: Files not matching the pattern are never considered.
#[test]
fn test_non_matching_files_ignored() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "orders_1.json", SNAPSHOT_A, 0);
    drop_file(dir.path(), "clients_1.json.tmp", SNAPSHOT_A, 0);
    let loader = loader_for(dir.path());

    assert_eq!(loader.poll_once().unwrap(), PollOutcome::NoCandidate);
    assert!(loader.index().is_empty().unwrap());
}

// =============================================================================
// FAILURE ISOLATION
// =============================================================================

/// Test: A newer malformed file leaves A fully in place and status still
/// names A.
#[test]
fn test_failed_parse_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_a.json", SNAPSHOT_A, 120);
    let loader = loader_for(dir.path());
    loader.poll_once().unwrap();

    drop_file(dir.path(), "clients_b.json", r#"[{"id": 9, "email": "#, 10);

    let err = loader.poll_once().unwrap_err();
    assert!(matches!(err, LoaderError::Parse { .. }));
    assert_eq!(err.path().unwrap().file_name().unwrap(), "clients_b.json");

    assert_eq!(loader.index().len().unwrap(), 2);
    assert!(loader.index().get_by_email(Some("MARIE@x.com")).unwrap().is_some());
    assert_eq!(loader.status().applied().unwrap().file_name, "clients_a.json");
}

/// Test: A document that is valid JSON but not an array is rejected whole.
#[test]
fn test_non_array_document_rejected() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_1.json", r#"{"id": 1}"#, 10);
    let loader = loader_for(dir.path());

    assert!(matches!(loader.poll_once(), Err(LoaderError::Parse { .. })));
    assert_eq!(loader.status(), SnapshotStatus::NothingLoaded);
}

/// Test: Once the bad file is replaced by a good one, loading resumes.
#[test]
fn test_recovers_after_bad_file_is_fixed() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_1.json", "not json", 30);
    let loader = loader_for(dir.path());
    assert!(loader.poll_once().is_err());

    drop_file(dir.path(), "clients_1.json", SNAPSHOT_B, 5);

    assert!(matches!(loader.poll_once().unwrap(), PollOutcome::Applied(_)));
    assert_eq!(loader.index().len().unwrap(), 2);
}

// =============================================================================
// RELOAD SEMANTICS
// =============================================================================

/// Test: Manual creates and updates are discarded by the next reload.
#[test]
fn test_reload_discards_manual_edits() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_a.json", SNAPSHOT_A, 60);
    let loader = loader_for(dir.path());
    loader.initialize().unwrap();

    let directory = ClientDirectory::new(Arc::clone(loader.index()), InvocationMonitor::noop());
    let created = directory
        .create(ClientRecord::default().name("Nouveau").email("new@x.com"))
        .unwrap();
    directory
        .update(1, ClientRecord::default().name("Renamed").email("marie@x.com"))
        .unwrap()
        .unwrap();

    assert!(matches!(loader.force_reload().unwrap(), PollOutcome::Applied(_)));

    assert!(directory.get_by_id(created.id.unwrap()).unwrap().is_none());
    assert!(directory.get_by_email(Some("new@x.com")).unwrap().is_none());
    let restored = directory.get_by_id(1).unwrap().unwrap();
    assert_eq!(restored.name.as_deref(), Some("Dupont"));
}

/// Test: Force reload of an empty directory is a no-op, not an error.
#[test]
fn test_force_reload_without_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let loader = loader_for(dir.path());

    assert_eq!(loader.force_reload().unwrap(), PollOutcome::NoCandidate);
    assert_eq!(loader.status().to_string(), "No file processed yet");
}

// =============================================================================
// SCHEDULED POLLING
// =============================================================================

/// Test: The polling task applies a file dropped while it runs.
#[tokio::test]
async fn test_run_picks_up_new_drop() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Arc::new(loader_for(dir.path()));
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(Arc::clone(&loader).run(rx));

    drop_file(dir.path(), "clients_b.json", SNAPSHOT_B, 1);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while loader.status().applied().is_none() {
        assert!(tokio::time::Instant::now() < deadline, "drop never applied");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(loader.index().len().unwrap(), 2);

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
}

/// Test: The async reload wrapper behaves like force_reload.
#[tokio::test]
async fn test_async_reload() {
    let dir = tempfile::tempdir().unwrap();
    drop_file(dir.path(), "clients_a.json", SNAPSHOT_A, 30);
    let loader = Arc::new(loader_for(dir.path()));

    assert!(matches!(loader.reload().await.unwrap(), PollOutcome::Applied(_)));
    assert!(matches!(loader.reload().await.unwrap(), PollOutcome::Applied(_)));
    assert_eq!(loader.poll().await.unwrap(), PollOutcome::Unchanged);
}
