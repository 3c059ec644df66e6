//! Shared integration-test harness: an in-process mock of the Akamai
//! diagnostic and property APIs, plus helpers for running the binary
//! against it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::process::Command;

/// Credential file pointing at the mock; host is replaced via the base URL override.
const EDGERC: &str = "\
[default]
host = akab-test.luna.akamaiapis.net
client_token = akab-test-client
client_secret = dGVzdC1zZWNyZXQ=
access_token = akab-test-access
";

#[derive(Clone, Default)]
struct MockState {
    flaky_hits: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

/// A running mock API and a credential file that targets it.
pub struct MockAkamai {
    pub base_url: String,
    state: MockState,
    dir: tempfile::TempDir,
    server: tokio::task::JoinHandle<()>,
}

impl MockAkamai {
    /// Binds the mock on an ephemeral port.
    #[allow(clippy::missing_panics_doc)]
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/diagnostic-tools/v2/url-debug", get(url_debug))
            .route(
                "/diagnostic-tools/v2/errors/{code}/translated-error",
                get(translated_error),
            )
            .route("/papi/v1/search/find-by-value", post(find_by_value))
            .route(
                "/papi/v1/properties/{id}/versions/{version}/rules",
                get(property_rules),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock");
        let addr = listener.local_addr().expect("no local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::write(dir.path().join(".edgerc"), EDGERC).expect("failed to write edgerc");

        Self {
            base_url: format!("http://{addr}"),
            state,
            dir,
            server,
        }
    }

    /// Path of the credential file.
    #[must_use]
    pub fn edgerc(&self) -> PathBuf {
        self.dir.path().join(".edgerc")
    }

    /// A scratch path inside the mock's temp dir.
    #[must_use]
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Number of authenticated requests served.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Runs the binary against the mock.
    pub async fn run(&self, args: &[&str]) -> Output {
        let edgerc = self.edgerc();
        let mut full = vec!["--edgerc", edgerc.to_str().expect("non-UTF-8 path")];
        full.extend_from_slice(args);
        run_binary(&full, Some(&self.base_url)).await
    }
}

impl Drop for MockAkamai {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Runs the binary with a clean `AKAMAI_*` environment.
#[allow(clippy::missing_panics_doc)]
pub async fn run_binary(args: &[&str], base_url: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_akamai-get"));
    cmd.args(args)
        .arg("--quiet")
        .env_remove("AKAMAI_EDGERC")
        .env_remove("AKAMAI_EDGERC_SECTION")
        .env_remove("AKAMAI_ACCOUNT_KEY")
        .env_remove("AKAMAI_GET_TIMEOUT")
        .env_remove("AKAMAI_GET_RETRIES")
        .env_remove("AKAMAI_GET_BASE_URL")
        .kill_on_drop(true);
    if let Some(url) = base_url {
        cmd.env("AKAMAI_GET_BASE_URL", url);
    }

    tokio::time::timeout(Duration::from_secs(30), cmd.output())
        .await
        .expect("binary did not finish in time")
        .expect("failed to run akamai-get")
}

/// Stdout as a string.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a string.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Reads a JSON file.
#[allow(clippy::missing_panics_doc)]
pub fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("export file missing");
    serde_json::from_str(&text).expect("export file is not JSON")
}

// ============================================================================
// Handlers
// ============================================================================

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"type": "unauthorized", "detail": "The signature does not match"})),
    )
        .into_response()
}

fn signed(state: &MockState, headers: &HeaderMap) -> bool {
    let ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.starts_with("EG1-HMAC-SHA256 client_token=akab-test-client;access_token=akab-test-access;")
                && v.contains(";signature=")
        });
    if ok {
        state.requests.fetch_add(1, Ordering::SeqCst);
    }
    ok
}

async fn url_debug(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !signed(&state, &headers) {
        return unauthorized();
    }
    let url = params.get("url").cloned().unwrap_or_default();

    if url.contains("slow") {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
    if url.contains("broken") {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    if url.contains("array") {
        return Json(json!(["statusCode", 200])).into_response();
    }
    if url.contains("failing") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    if url.contains("flaky") && state.flaky_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        return (StatusCode::SERVICE_UNAVAILABLE, "try again").into_response();
    }

    let mut body = json!({
        "statusCode": 200,
        "originStatusCode": 200,
        "originHostname": "origin.example.org",
        "originIp": "1.2.3.4",
        "cacheSetting": "TCP_MISS",
        "cpCode": 123_456,
        "urlDebug": {"logs": [{"description": "edge log line"}], "requestedUrl": url}
    });
    if let Some(key) = params.get("accountSwitchKey") {
        body["errorMessage"] = json!(format!("account {key}"));
    }
    Json(body).into_response()
}

async fn translated_error(
    State(state): State<MockState>,
    headers: HeaderMap,
    UrlPath(code): UrlPath<String>,
) -> Response {
    if !signed(&state, &headers) {
        return unauthorized();
    }
    Json(json!({
        "translatedError": {
            "url": "https://www.example.com/index.html",
            "httpResponseCode": 503,
            "timestamp": "Thu Sep 23 2021 14:25:13 GMT",
            "epochTime": 1_632_407_113,
            "clientIp": "192.0.2.10",
            "clientIpLocation": {"city": "Amsterdam", "regionCode": "NH", "countryCode": "NL"},
            "connectingIp": "192.0.2.10",
            "serverIp": "203.0.113.5",
            "userAgent": "",
            "requestMethod": "GET",
            "reasonForFailure": format!("lookup of {code}: Connection to origin timed out"),
            "wafDetails": [],
            "logs": []
        }
    }))
    .into_response()
}

async fn find_by_value(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !signed(&state, &headers) {
        return unauthorized();
    }
    let items = if body["hostname"] == "www.example.com" {
        json!([
            {
                "propertyId": "prp_100",
                "propertyName": "www.example.com",
                "propertyVersion": 4,
                "contractId": "ctr_1-ABC",
                "groupId": "grp_1",
                "productionStatus": "INACTIVE"
            },
            {
                "propertyId": "prp_100",
                "propertyName": "www.example.com",
                "propertyVersion": 5,
                "contractId": "ctr_1-ABC",
                "groupId": "grp_1",
                "productionStatus": "ACTIVE"
            }
        ])
    } else {
        json!([])
    };
    Json(json!({"versions": {"items": items}})).into_response()
}

async fn property_rules(
    State(state): State<MockState>,
    headers: HeaderMap,
    UrlPath((id, version)): UrlPath<(String, u64)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !signed(&state, &headers) {
        return unauthorized();
    }
    if id != "prp_100"
        || version != 5
        || params.get("contractId").map(String::as_str) != Some("ctr_1-ABC")
        || params.get("groupId").map(String::as_str) != Some("grp_1")
    {
        return (StatusCode::NOT_FOUND, "no such property version").into_response();
    }
    Json(json!({
        "propertyId": id,
        "propertyVersion": version,
        "rules": {
            "name": "default",
            "behaviors": [
                {"name": "origin", "options": {"originType": "CUSTOMER", "hostname": "origin.example.org"}},
                {"name": "cpCode", "options": {"value": {"id": 123_456}}}
            ],
            "children": [{
                "name": "Downloads",
                "behaviors": [
                    {"name": "origin", "options": {
                        "originType": "NET_STORAGE",
                        "netStorage": {"downloadDomainName": "example.download.akamai.com"}
                    }}
                ],
                "children": []
            }]
        }
    }))
    .into_response()
}
