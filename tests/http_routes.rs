//! HTTP Route Tests
//!
//! Drives the assembled router in-process with `tower::ServiceExt::oneshot`.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use clientdir::config::ListenerConfig;
use clientdir::http_server::{AppState, HttpServer};
use clientdir::index::ClientIndex;
use clientdir::loader::{FilePattern, LoaderConfig, SnapshotLoader};
use clientdir::monitor::{InvocationMonitor, MetricsRegistry};
use clientdir::service::ClientDirectory;

const SNAPSHOT: &str = r#"[
    {"id": 1, "nom": "Dupont", "prenom": "Marie", "email": "Marie@X.com", "ville": "Paris"},
    {"id": 2, "nom": "Durand", "email": "paul@x.com", "ville": "Lyon"},
    {"id": 3, "nom": "Dupuis", "ville": "Paris"}
]"#;

struct Harness {
    router: Router,
    _dir: tempfile::TempDir,
}

fn harness_with(snapshot: Option<&str>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    if let Some(body) = snapshot {
        fs::write(dir.path().join("clients_1.json"), body).unwrap();
    }

    let index = Arc::new(ClientIndex::new());
    let metrics = Arc::new(MetricsRegistry::new());
    let loader = Arc::new(loader_for(dir.path(), Arc::clone(&index)));
    loader.initialize().unwrap();

    let directory = Arc::new(ClientDirectory::new(
        index,
        InvocationMonitor::new(metrics.clone()),
    ));
    let state = AppState::new(directory, loader, metrics);
    let router = HttpServer::new(ListenerConfig::default(), state).router();

    Harness { router, _dir: dir }
}

fn loader_for(dir: &Path, index: Arc<ClientIndex>) -> SnapshotLoader {
    let config = LoaderConfig {
        watch_dir: dir.to_path_buf(),
        pattern: FilePattern::new("clients_*.json").unwrap(),
        poll_interval: Duration::from_secs(10),
        initial_delay: Duration::from_secs(5),
    };
    SnapshotLoader::new(config, index)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

// =============================================================================
// LOOKUPS
// =============================================================================

#[tokio::test]
async fn test_list_all_clients() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, body) = get(&h.router, "/clients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);
    assert_eq!(body[0]["name"], "Dupont");
    assert_eq!(body[0]["firstName"], "Marie");
    assert_eq!(body[0]["city"], "Paris");
}

#[tokio::test]
async fn test_query_parameters_switch_to_search() {
    let h = harness_with(Some(SNAPSHOT));

    let (_, body) = get(&h.router, "/clients?city=paris").await;
    assert_eq!(ids(&body), vec![1, 3]);

    let (_, body) = get(&h.router, "/clients?city=paris&name=PUI").await;
    assert_eq!(ids(&body), vec![3]);
}

#[tokio::test]
async fn test_get_by_id() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, body) = get(&h.router, "/clients/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "paul@x.com");

    let (status, body) = get(&h.router, "/clients/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_get_by_email_ignores_case() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, body) = get(&h.router, "/clients/by-email/marie@x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, _) = get(&h.router, "/clients/by-email/nobody@x.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// EDITS
// =============================================================================

#[tokio::test]
async fn test_create_update_delete() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, created) = send(
        &h.router,
        Method::POST,
        "/clients",
        Some(json!({"name": "Martin", "email": "lea@x.com", "city": "Nantes"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &h.router,
        Method::PUT,
        &format!("/clients/{id}"),
        Some(json!({"name": "Martin", "email": "lea.martin@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["email"], "lea.martin@x.com");
    assert!(updated.get("city").is_none());

    let (_, found) = get(&h.router, "/clients/by-email/LEA.MARTIN@x.com").await;
    assert_eq!(found["id"], id);

    let (status, body) = send(&h.router, Method::DELETE, &format!("/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": true}));

    let (_, body) = send(&h.router, Method::DELETE, &format!("/clients/{id}"), None).await;
    assert_eq!(body, json!({"deleted": false}));
}

#[tokio::test]
async fn test_update_unknown_is_not_found() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, _) = send(&h.router, Method::PUT, "/clients/404", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&h.router, "/clients/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// ADMIN
// =============================================================================

#[tokio::test]
async fn test_snapshot_status_and_reload() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, body) = get(&h.router, "/admin/snapshot").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["state"], "loaded");
    assert_eq!(body["status"]["file_name"], "clients_1.json");
    assert!(body["summary"].as_str().unwrap().starts_with("File: clients_1.json"));

    send(&h.router, Method::DELETE, "/clients/1", None).await;
    let (status, body) = send(&h.router, Method::POST, "/admin/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "applied");
    assert_eq!(body["cache_size"], 3);

    let (status, _) = get(&h.router, "/clients/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reload_with_empty_directory() {
    let h = harness_with(None);

    let (_, body) = get(&h.router, "/admin/snapshot").await;
    assert_eq!(body["status"]["state"], "nothing_loaded");
    assert_eq!(body["summary"], "No file processed yet");

    let (status, body) = send(&h.router, Method::POST, "/admin/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "no_candidate");
    assert_eq!(body["cache_size"], 0);
}

// =============================================================================
// OBSERVABILITY
// =============================================================================

#[tokio::test]
async fn test_health_reports_cache_size() {
    let h = harness_with(Some(SNAPSHOT));

    let (status, body) = get(&h.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache_size"], 3);
}

#[tokio::test]
async fn test_metrics_reflect_requests() {
    let h = harness_with(Some(SNAPSHOT));
    get(&h.router, "/clients").await;
    get(&h.router, "/clients/1").await;
    get(&h.router, "/clients/404").await;

    let (status, body) = get(&h.router, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requests_total"], 3);
    assert_eq!(body["requests_by_operation"]["getClientById"], 2);
    assert_eq!(body["errors_total"], 0);
    assert_eq!(body["latency"]["getAllClients"]["count"], 1);
}
