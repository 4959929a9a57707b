#![allow(clippy::unwrap_used)]
// Store lifecycle tests against a wiremock service.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use updater_api::UpdaterClient;
use updater_core::{
    ActionResult, ConfigPatch, ConfigStore, FilePreferences, HistoryStore, ImportFile,
    MemoryPreferences, Session, SessionConfig, TaskStore, ThemeMode,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn client(server: &MockServer) -> Arc<UpdaterClient> {
    Arc::new(UpdaterClient::from_url(&server.uri()).unwrap())
}

/// A client for a loopback port nothing listens on.
fn unreachable_client() -> Arc<UpdaterClient> {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Arc::new(UpdaterClient::from_url(&format!("http://{addr}")).unwrap())
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

async fn mount(server: &MockServer, verb: &str, route: &str, template: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

fn history_entries(n: usize) -> Value {
    (0..n)
        .map(|i| {
            json!({
                "timestamp": format!("2024-03-01 0{i}:00:00"),
                "task": "mihomo update",
                "success": true,
                "message": "ok"
            })
        })
        .collect()
}

async fn loaded_config_store(server: &MockServer, config: Value) -> ConfigStore {
    mount(server, "GET", "/api/config", ok(config)).await;
    let store = ConfigStore::new(client(server));
    store.fetch_config().await;
    server.reset().await;
    store
}

// ── Config: fetch ───────────────────────────────────────────────────

#[tokio::test]
async fn fetch_config_replaces_state_with_server_object() {
    let server = MockServer::start().await;
    let remote = json!({
        "fetch_url": "https://example.com/sub",
        "fetch_interval": 3600,
        "web_port": 5000,
        "unknown_extension": { "nested": true }
    });
    mount(&server, "GET", "/api/config", ok(remote.clone())).await;

    let store = ConfigStore::new(client(&server));
    store.fetch_config().await;

    let state = store.state();
    assert_eq!(serde_json::to_value(&state.data).unwrap(), remote);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn fetch_config_transport_failure_keeps_data() {
    let server = MockServer::start().await;
    let store = loaded_config_store(&server, json!({ "web_port": 5000 })).await;
    mount(&server, "GET", "/api/config", ResponseTemplate::new(500)).await;

    store.fetch_config().await;

    let state = store.state();
    assert_eq!(state.data.web_port(), Some(5000));
    assert_eq!(state.error.as_deref(), Some("internal server error"));
    assert!(!state.loading);
}

#[tokio::test]
async fn fetch_config_logical_failure_uses_server_message() {
    let server = MockServer::start().await;
    let store = loaded_config_store(&server, json!({ "web_port": 5000 })).await;
    mount(
        &server,
        "GET",
        "/api/config",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "success": false, "message": "config file unreadable" })),
    )
    .await;

    store.fetch_config().await;

    let state = store.state();
    assert_eq!(state.error.as_deref(), Some("config file unreadable"));
    assert_eq!(state.data.web_port(), Some(5000));
}

#[tokio::test]
async fn fetch_config_without_data_uses_fallback() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/config",
        ResponseTemplate::new(200).set_body_json(json!({ "success": true })),
    )
    .await;

    let store = ConfigStore::new(client(&server));
    store.fetch_config().await;

    assert_eq!(
        store.state().error.as_deref(),
        Some("failed to fetch configuration")
    );
    assert!(store.config().is_empty());
}

#[tokio::test]
async fn fetch_config_unreachable_server() {
    let store = ConfigStore::new(unreachable_client());
    store.fetch_config().await;

    let state = store.state();
    assert_eq!(
        state.error.as_deref(),
        Some("server unresponsive, check network connectivity")
    );
    assert!(!state.loading);
}

#[tokio::test]
async fn new_fetch_clears_previous_error() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/api/config", ResponseTemplate::new(404)).await;
    let store = ConfigStore::new(client(&server));
    store.fetch_config().await;
    assert_eq!(
        store.state().error.as_deref(),
        Some("requested resource not found")
    );

    server.reset().await;
    mount(&server, "GET", "/api/config", ok(json!({ "web_port": 1 }))).await;
    store.fetch_config().await;

    assert_eq!(store.state().error, None);
    assert_eq!(store.config().web_port(), Some(1));
}

// ── Config: loading lifecycle ───────────────────────────────────────

#[tokio::test]
async fn loading_true_while_pending_then_false_on_success() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/config",
        ok(json!({ "web_port": 5000 })).set_delay(Duration::from_millis(200)),
    )
    .await;

    let store = ConfigStore::new(client(&server));
    let mut watch = store.subscribe();

    let handle = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_config().await }
    });

    let pending = watch.changed().await.unwrap();
    assert!(pending.loading);
    assert_eq!(pending.error, None);

    handle.await.unwrap();
    let settled = watch.current();
    assert!(!settled.loading);
    assert_eq!(settled.data.web_port(), Some(5000));
}

#[tokio::test]
async fn loading_true_while_pending_then_false_on_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/history",
        ResponseTemplate::new(500).set_delay(Duration::from_millis(200)),
    )
    .await;

    let store = HistoryStore::new(client(&server));
    let mut watch = store.subscribe();

    let handle = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_history().await }
    });

    assert!(watch.changed().await.unwrap().loading);

    handle.await.unwrap();
    let settled = store.state();
    assert!(!settled.loading);
    assert_eq!(settled.error.as_deref(), Some("internal server error"));
}

#[tokio::test]
async fn cancelled_fetch_does_not_leave_loading_stuck() {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        "/api/config",
        ok(json!({})).set_delay(Duration::from_secs(5)),
    )
    .await;

    let store = ConfigStore::new(client(&server));
    let result = tokio::time::timeout(Duration::from_millis(100), store.fetch_config()).await;

    assert!(result.is_err(), "fetch should still have been pending");
    assert!(!store.state().loading);
}

#[tokio::test]
async fn overlapping_fetches_last_completer_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ok(json!({ "source": "slow" })).set_delay(Duration::from_millis(600)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ok(json!({ "source": "fast" })).set_delay(Duration::from_millis(50)))
        .mount(&server)
        .await;

    let store = ConfigStore::new(client(&server));
    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_config().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_config().await }
    });

    fast.await.unwrap();
    let mid = store.state();
    assert_eq!(mid.data.get("source"), Some(&json!("fast")));
    assert!(mid.loading, "loading must hold while the slow fetch is in flight");

    slow.await.unwrap();
    let end = store.state();
    assert_eq!(end.data.get("source"), Some(&json!("slow")));
    assert!(!end.loading);
}

#[tokio::test]
async fn stream_yields_current_then_each_transition() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/api/history", ok(history_entries(2))).await;

    let store = HistoryStore::new(client(&server));
    let mut stream = store.subscribe().into_stream();

    let initial = stream.next().await.unwrap();
    assert!(initial.data.is_empty());
    assert!(!initial.loading);

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_history().await }
    });

    let mut observed = Vec::new();
    while let Some(state) = stream.next().await {
        let done = !state.loading;
        observed.push(state);
        if done {
            break;
        }
    }
    fetch.await.unwrap();

    let last = observed.last().unwrap();
    assert_eq!(last.data.len(), 2);
    assert_eq!(last.error, None);
}

// ── Config: save ────────────────────────────────────────────────────

#[tokio::test]
async fn save_config_merges_patch_locally() {
    let server = MockServer::start().await;
    let store = loaded_config_store(
        &server,
        json!({ "fetch_interval": 3600, "web_port": 5000, "backup_dir": "/data/backups" }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({ "fetch_interval": 600 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "config updated" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = store
        .save_config(&ConfigPatch::new().set("fetch_interval", 600))
        .await;

    assert_eq!(result, ActionResult::ok("config updated"));
    let state = store.state();
    assert_eq!(
        serde_json::to_value(&state.data).unwrap(),
        json!({ "fetch_interval": 600, "web_port": 5000, "backup_dir": "/data/backups" })
    );
    assert_eq!(state.error, None);
    assert!(!state.loading);
}

#[tokio::test]
async fn save_config_does_not_refetch() {
    let server = MockServer::start().await;
    let store = loaded_config_store(&server, json!({ "fetch_interval": 3600 })).await;

    // The server would report a normalised value; the client never asks.
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ok(json!({ "fetch_interval": 900 })))
        .expect(0)
        .mount(&server)
        .await;
    mount(
        &server,
        "POST",
        "/api/config",
        ResponseTemplate::new(200).set_body_json(json!({ "success": true })),
    )
    .await;

    let result = store
        .save_config(&ConfigPatch::new().set("fetch_interval", 1))
        .await;

    assert_eq!(result, ActionResult::ok("configuration updated"));
    assert_eq!(store.config().fetch_interval(), Some(1));
}

#[tokio::test]
async fn save_config_failure_reports_same_message_twice() {
    let server = MockServer::start().await;
    let store = loaded_config_store(&server, json!({ "web_port": 5000 })).await;
    mount(
        &server,
        "POST",
        "/api/config",
        ResponseTemplate::new(400)
            .set_body_json(json!({ "success": false, "message": "no config data provided" })),
    )
    .await;

    let result = store
        .save_config(&ConfigPatch::new().set("web_port", 8080))
        .await;

    assert_eq!(result, ActionResult::failed("no config data provided"));
    let state = store.state();
    assert_eq!(state.error.as_deref(), Some(result.message.as_str()));
    assert_eq!(state.data.web_port(), Some(5000));
    assert!(!state.loading);
}

#[tokio::test]
async fn save_config_logical_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/config",
        ResponseTemplate::new(200).set_body_json(json!({ "success": false })),
    )
    .await;

    let store = ConfigStore::new(client(&server));
    let result = store
        .save_config(&ConfigPatch::new().set("web_port", 8080))
        .await;

    assert_eq!(result, ActionResult::failed("failed to update configuration"));
    assert!(store.config().is_empty());
}

// ── History ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_history_replaces_list_atomically() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/api/history", ok(history_entries(3))).await;

    let store = HistoryStore::new(client(&server));
    store.fetch_history().await;
    assert_eq!(store.history().len(), 3);

    server.reset().await;
    mount(&server, "GET", "/api/history", ok(history_entries(1))).await;
    store.fetch_history().await;

    let state = store.state();
    assert_eq!(state.data.len(), 1);
    assert_eq!(state.data[0].timestamp, "2024-03-01 00:00:00");
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn fetch_history_failure_keeps_list() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/api/history", ok(history_entries(2))).await;

    let store = HistoryStore::new(client(&server));
    store.fetch_history().await;

    server.reset().await;
    mount(
        &server,
        "GET",
        "/api/history",
        ResponseTemplate::new(200).set_body_json(json!({ "success": false })),
    )
    .await;
    store.fetch_history().await;

    let state = store.state();
    assert_eq!(state.data.len(), 2);
    assert_eq!(state.error.as_deref(), Some("failed to fetch history"));
}

// ── Tasks ───────────────────────────────────────────────────────────

#[tokio::test]
async fn task_actions_report_and_record_outcome() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/update/mihomo",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "success": true, "message": "mihomo config updated" })),
    )
    .await;
    mount(
        &server,
        "POST",
        "/api/update/geoip",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "success": false, "message": "geoip download failed" })),
    )
    .await;

    let store = TaskStore::new(client(&server));

    let result = store.update_mihomo().await;
    assert_eq!(result, ActionResult::ok("mihomo config updated"));
    assert_eq!(store.last_result(), Some(result));
    assert_eq!(store.state().error, None);

    let result = store.update_geoip().await;
    assert!(!result.success);
    let state = store.state();
    assert_eq!(state.error.as_deref(), Some("geoip download failed"));
    assert_eq!(state.data, Some(result));
    assert!(!state.loading);
}

#[tokio::test]
async fn task_action_success_with_data_payload_is_success() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/api/update/mihomo",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "success": true, "message": "ok", "data": { "job": 1 } })),
    )
    .await;
    mount(
        &server,
        "POST",
        "/api/config",
        ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": ["web_port"] })),
    )
    .await;

    let tasks = TaskStore::new(client(&server));
    assert_eq!(tasks.update_mihomo().await, ActionResult::ok("ok"));
    assert_eq!(tasks.state().error, None);

    let config = ConfigStore::new(client(&server));
    let result = config
        .save_config(&ConfigPatch::new().set("web_port", 8080))
        .await;
    assert_eq!(result, ActionResult::ok("configuration updated"));
    assert_eq!(config.config().get("web_port"), Some(&json!(8080)));
}

#[tokio::test]
async fn import_local_failure_uses_transport_message() {
    let server = MockServer::start().await;
    mount(&server, "POST", "/api/import/local", ResponseTemplate::new(404)).await;

    let store = TaskStore::new(client(&server));
    let result = store
        .import_local(ImportFile::new("clash.yaml", "port: 7890\n"))
        .await;

    assert_eq!(result, ActionResult::failed("requested resource not found"));
    assert_eq!(
        store.state().error.as_deref(),
        Some("requested resource not found")
    );
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn session_wires_stores_to_one_service() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/api/config", ok(json!({ "web_port": 5000 }))).await;
    mount(&server, "GET", "/api/history", ok(history_entries(2))).await;
    mount(
        &server,
        "GET",
        "/health",
        ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })),
    )
    .await;

    let config = SessionConfig::new(server.uri().parse().unwrap());
    let session = Session::new(&config, Arc::new(MemoryPreferences::new())).unwrap();

    session.config().fetch_config().await;
    session.history().fetch_history().await;

    assert_eq!(session.config().config().web_port(), Some(5000));
    assert_eq!(session.history().history().len(), 2);
    assert!(session.health().await.unwrap().is_ok());
}

#[tokio::test]
async fn theme_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("preferences.toml");
    let config = SessionConfig::new("http://127.0.0.1:9".parse().unwrap());

    for mode in [ThemeMode::Dark, ThemeMode::Light, ThemeMode::Auto] {
        let first = Session::new(&config, Arc::new(FilePreferences::new(&prefs_path))).unwrap();
        first.theme().set_theme(mode);

        let reloaded =
            Session::new(&config, Arc::new(FilePreferences::new(&prefs_path))).unwrap();
        assert_eq!(reloaded.theme().is_dark_mode(), mode);
    }
}
