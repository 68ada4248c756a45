//! HTTP accessor, module manager and live views against a stub API server.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use qlog_dashboard::charts::AllContainers;
use qlog_dashboard::config::ClientConfig;
use qlog_dashboard::format::Severity;
use qlog_dashboard::live::LiveViews;
use qlog_dashboard::modules::ModuleManager;
use qlog_dashboard::routing::{Filters, SessionState, View, ViewCollaborators, ViewState};
use qlog_dashboard::{ApiClient, LogQuery};

const SESSION_COOKIE: &str = "qlog_session=abc123";

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
    modules: Arc<Mutex<BTreeMap<String, bool>>>,
    puts: Arc<Mutex<Vec<Value>>>,
    fail_put: bool,
}

impl Stub {
    fn new() -> Self {
        let stub = Stub::default();
        {
            let mut modules = stub.modules.lock().unwrap();
            modules.insert("meraki".to_string(), true);
            modules.insert("ubiquiti".to_string(), false);
        }
        stub
    }

    fn record(&self, method: &str, uri: &Uri, headers: &HeaderMap) {
        let cookie = headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.requests
            .lock()
            .unwrap()
            .push((format!("{} {}", method, uri), cookie));
    }

    fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }
}

async fn modules_get(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    stub.record("GET", &uri, &headers);
    let list: Vec<Value> = stub
        .modules
        .lock()
        .unwrap()
        .iter()
        .map(|(device_type, enabled)| json!({ "device_type": device_type, "enabled": enabled }))
        .collect();
    Json(Value::Array(list))
}

async fn modules_put(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    stub.record("PUT", &uri, &headers);
    if stub.fail_put {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    stub.puts.lock().unwrap().push(body.clone());
    if let Some(map) = body["enabled_modules"].as_object() {
        let mut modules = stub.modules.lock().unwrap();
        modules.clear();
        for (device_type, enabled) in map {
            modules.insert(device_type.clone(), enabled.as_bool().unwrap_or(true));
        }
    }
    Ok(Json(json!({ "status": "ok" })))
}

async fn module_metadata(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    stub.record("GET", &uri, &headers);
    Json(json!({
        "meraki": {
            "device_type": "meraki",
            "device_name": "Cisco Meraki",
            "description": "MX security appliances",
            "event_types": ["ids_alert", "flow"],
            "common_fields": ["src", "dst"]
        },
        "ubiquiti": { "device_type": "ubiquiti", "device_name": "UniFi", "event_types": [] },
        "cisco": { "device_type": "cisco", "event_types": ["port_down"] }
    }))
}

async fn stats(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    stub.record("GET", &uri, &headers);
    Json(json!({
        "total": 1500,
        "recent_hour": 20,
        "by_severity": { "Error": 3, "Warning": 9 },
        "by_hostname": { "fw": 12, "ap": 3 },
        "by_protocol": { "UDP": 1400, "TCP": 100 }
    }))
}

async fn server_info(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> StatusCode {
    stub.record("GET", &uri, &headers);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn logs(State(stub): State<Stub>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    stub.record("GET", &uri, &headers);
    if uri.query().unwrap_or_default().contains("offset=500") {
        // past the end: the server sends null
        return Json(Value::Null);
    }
    Json(json!([{
        "id": 1,
        "timestamp": "2024-05-01T10:00:00Z",
        "severity": 3,
        "hostname": "fw",
        "message": "deny tcp"
    }]))
}

async fn saved_view(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    stub.record("GET", &uri, &headers);
    if id == "7" {
        Ok(Json(json!({ "id": 7, "name": "Firewall", "widgets": [] })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn spawn_stub(stub: Stub) -> ApiClient {
    let app = Router::new()
        .route("/api/modules", get(modules_get).put(modules_put))
        .route("/api/module-metadata", get(module_metadata))
        .route("/api/stats", get(stats))
        .route("/api/server/info", get(server_info))
        .route("/api/logs", get(logs))
        .route("/api/views/{id}", get(saved_view))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(&ClientConfig {
        base_url: format!("http://{}", addr),
        session_cookie: Some(SESSION_COOKIE.to_string()),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_session_cookie_on_every_request() {
    let stub = Stub::new();
    let client = spawn_stub(stub.clone()).await;

    client.stats().await.unwrap();
    client.logs(&LogQuery::recent(10)).await.unwrap();
    client.view("7").await.unwrap();
    ModuleManager::new(client.clone())
        .toggle_module("meraki", false)
        .await
        .unwrap();

    let requests = stub.requests.lock().unwrap().clone();
    assert!(requests.len() >= 7);
    for (path, cookie) in requests {
        assert_eq!(cookie.as_deref(), Some(SESSION_COOKIE), "{}", path);
    }
}

#[tokio::test]
async fn test_toggle_sends_full_map_then_refetches() {
    let stub = Stub::new();
    let client = spawn_stub(stub.clone()).await;

    let cards = ModuleManager::new(client)
        .toggle_module("ubiquiti", true)
        .await
        .unwrap();

    let puts = stub.puts.lock().unwrap().clone();
    assert_eq!(
        puts,
        vec![json!({ "enabled_modules": { "meraki": true, "ubiquiti": true } })]
    );
    assert_eq!(
        stub.paths(),
        vec![
            "GET /api/modules",
            "PUT /api/modules",
            "GET /api/modules",
            "GET /api/module-metadata",
        ]
    );

    let types: Vec<&str> = cards
        .iter()
        .map(|c| c.metadata.device_type.as_str())
        .collect();
    assert_eq!(types, vec!["cisco", "meraki", "ubiquiti"]);
    assert!(cards.iter().all(|c| c.enabled));
    assert_eq!(cards[0].title(), "cisco");
}

#[tokio::test]
async fn test_toggle_failure_still_refetches() {
    let stub = Stub {
        fail_put: true,
        ..Stub::new()
    };
    let client = spawn_stub(stub.clone()).await;

    let err = ModuleManager::new(client)
        .toggle_module("meraki", false)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        stub.paths().last().map(String::as_str),
        Some("GET /api/module-metadata")
    );
    assert!(stub.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let client = spawn_stub(Stub::new()).await;

    let err = client.server_info().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));

    let err = client.view("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_logs_query_and_null_body() {
    let stub = Stub::new();
    let client = spawn_stub(stub.clone()).await;

    let filters = Filters {
        severity: Severity::new(3),
        ..Filters::default()
    };
    let entries = client
        .logs(&LogQuery::from_state(&ViewState::default(), &filters))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].hostname, "fw");

    let mut view = ViewState::default();
    view.current_page = 10;
    let entries = client
        .logs(&LogQuery::from_state(&view, &Filters::default()))
        .await
        .unwrap();
    assert!(entries.is_empty());

    assert_eq!(
        stub.paths(),
        vec![
            "GET /api/logs?limit=50&offset=0&severity=3&date_range=24h",
            "GET /api/logs?limit=50&offset=500&date_range=24h",
        ]
    );
}

#[tokio::test]
async fn test_live_dashboard_tolerates_server_info_failure() {
    let client = spawn_stub(Stub::new()).await;
    let live = LiveViews::new(client, SessionState::default(), &AllContainers);
    let rx = live.subscribe_dashboard();

    let snapshot = live.load_dashboard().await.unwrap();
    assert!(snapshot.server_info.is_none());
    assert_eq!(snapshot.stats.total, 1500);
    assert_eq!(snapshot.recent_logs.len(), 1);

    let protocol = snapshot.charts.protocol.as_ref().unwrap();
    assert_eq!(protocol.dataset.data, vec![1400, 100, 0]);
    let trends = snapshot.charts.trends.as_ref().unwrap();
    assert_eq!(trends.dataset.data, vec![1500]);

    assert!(rx.borrow().is_some());
}

#[tokio::test]
async fn test_live_fetch_logs_publishes_page() {
    let client = spawn_stub(Stub::new()).await;
    let state = SessionState::default();
    state.write().view.current_view = View::Logs;
    let live = LiveViews::new(client, state, &AllContainers);
    let mut rx = live.subscribe_logs();

    live.fetch_logs();
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();

    let page = rx.borrow().clone().unwrap();
    assert_eq!(page.page, 0);
    assert_eq!(page.entries.len(), 1);
}

#[tokio::test]
async fn test_live_view_display() {
    let client = spawn_stub(Stub::new()).await;
    let live = LiveViews::new(client, SessionState::default(), &AllContainers);
    let mut active = live.subscribe_active_view();
    let mut rx = live.subscribe_view_display();

    live.load_view_display("7", false);
    assert_eq!(*active.borrow_and_update(), View::ViewDisplay);

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    let view = rx.borrow().clone().unwrap();
    assert_eq!(view.title(), "Firewall");
    assert!(view.extra.contains_key("widgets"));
}
