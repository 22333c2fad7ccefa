//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use tekniker_api::{AppState, build_app};
use tekniker_cache::CacheManager;
use tekniker_cache::memory::MemoryCacheProvider;
use tekniker_clearpass::ClearPassClient;
use tekniker_core::config::AppConfig;
use tekniker_core::error::AppError;
use tekniker_core::result::AppResult;
use tekniker_core::traits::mailer::Mailer;

/// Allow-list used unless a test writes its own.
pub const DEFAULT_ALLOWLIST: &str = r#"[
    {"email": "ngdata.no", "roles": [{"name": "Guest", "role_id": 2}]},
    {"email": "sjef@ngdata.no", "roles": []},
    {"email": "partner.no", "roles": [
        {"name": "Contractor", "role_id": "3"},
        {"name": "IoT", "role_id": 4}
    ]}
]"#;

static APP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Mailer that records codes instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    /// `(recipient, code)` in send order.
    pub sent: Mutex<Vec<(String, String)>>,
    /// Fail every delivery when set.
    pub fail: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_auth_code(&self, recipient: &str, code: &str, _valid_minutes: u64) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::mail("relay refused"));
        }
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), code.to_string()));
        Ok(())
    }
}

/// A request seen by the fake ClearPass server.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// HTTP method.
    pub method: String,
    /// Decoded path.
    pub path: String,
    /// JSON body, `Null` when absent.
    pub body: Value,
    /// `Authorization` header value.
    pub authorization: Option<String>,
}

/// Fake ClearPass API bound to an ephemeral local port.
#[derive(Debug, Clone)]
pub struct FakeClearPass {
    /// Base URL of the fake server.
    pub base_url: String,
    /// Requests seen, excluding token requests.
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    /// Number of token requests.
    pub token_requests: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct FakeState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    token_requests: Arc<AtomicUsize>,
}

impl FakeState {
    async fn record(&self, method: &str, path: String, body: Value, headers: &HeaderMap) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.requests.lock().await.push(Recorded {
            method: method.to_string(),
            path,
            body,
            authorization,
        });
    }
}

impl FakeClearPass {
    /// Start the fake server.
    pub async fn start() -> Self {
        let state = FakeState {
            requests: Arc::default(),
            token_requests: Arc::default(),
        };

        let router = Router::new()
            .route("/api/oauth", post(oauth))
            .route("/api/device", post(create_device))
            .route("/api/device/mac/{mac}", get(get_device).patch(update_device))
            .route("/api/role-mapping/name/{name}", get(role_mapping))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests: state.requests,
            token_requests: state.token_requests,
        }
    }

    /// Requests seen so far.
    pub async fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().await.clone()
    }
}

async fn oauth(State(state): State<FakeState>) -> Json<Value> {
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "access_token": format!("cp-token-{n}"), "expires_in": 3600, "token_type": "Bearer" }))
}

async fn get_device(
    State(state): State<FakeState>,
    Path(mac): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state
        .record("GET", format!("/api/device/mac/{mac}"), Value::Null, &headers)
        .await;
    if mac == "00:00:00:00:00:00" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "title": "Not Found", "detail": "Device not found" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "id": 11, "mac": mac, "role_id": 2, "enabled": true, "visitor_name": "Printer" })),
    )
}

async fn create_device(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .record("POST", "/api/device".to_string(), body.clone(), &headers)
        .await;
    let mut created = body;
    created["id"] = json!(42);
    (StatusCode::CREATED, Json(created))
}

async fn update_device(
    State(state): State<FakeState>,
    Path(mac): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state
        .record("PATCH", format!("/api/device/mac/{mac}"), body.clone(), &headers)
        .await;
    let mut updated = body;
    updated["id"] = json!(11);
    Json(updated)
}

async fn role_mapping(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    state
        .record("GET", format!("/api/role-mapping/name/{name}"), Value::Null, &headers)
        .await;
    Json(json!({
        "id": 3001,
        "name": name,
        "rules": [
            { "role_name": "Guest", "role_id": 2 },
            { "role_name": "Contractor", "condition": [{ "type": "Application", "value": 3 }] },
            { "name": "IoT", "role_id": "4" },
            { "role_name": "Unnamed-Id" }
        ]
    }))
}

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// JSON body, `Null` when not JSON.
    pub body: Value,
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Captured login codes
    pub mailer: Arc<RecordingMailer>,
    /// Fake ClearPass API
    pub clearpass: FakeClearPass,
    /// Allow-list file for this app
    pub allowlist_path: PathBuf,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting its configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let clearpass = FakeClearPass::start().await;

        let allowlist_path = std::env::temp_dir().join(format!(
            "tekniker-it-{}-{}.json",
            std::process::id(),
            APP_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::write(&allowlist_path, DEFAULT_ALLOWLIST).expect("Failed to write allow-list");

        let mut config = AppConfig::default();
        config.clearpass.base_url = clearpass.base_url.clone();
        config.clearpass.client_id = "tekniker".to_string();
        config.clearpass.client_secret = "secret".to_string();
        config.clearpass.request_timeout_seconds = 5;
        config.smtp.server = "localhost".to_string();
        config.smtp.from = "noreply@ngdata.no".to_string();
        config.auth.allowlist_path = allowlist_path.to_string_lossy().into_owned();
        adjust(&mut config);

        let provider = MemoryCacheProvider::new(&config.cache.memory);
        let cache = Arc::new(CacheManager::from_provider(Arc::new(provider)));
        let mailer = Arc::new(RecordingMailer::default());
        let client = ClearPassClient::new(&config.clearpass).expect("Failed to build ClearPass client");

        let state = AppState::new(config.clone(), cache, mailer.clone(), client);
        let router = build_app(state);

        Self {
            router,
            config,
            mailer,
            clearpass,
            allowlist_path,
        }
    }

    /// Replace the allow-list file contents.
    pub fn write_allowlist(&self, contents: &str) {
        std::fs::write(&self.allowlist_path, contents).expect("Failed to write allow-list");
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let auth = token.map(|t| format!("Bearer {t}"));
        let headers: Vec<(&str, &str)> = auth
            .as_deref()
            .map(|a| vec![("Authorization", a)])
            .unwrap_or_default();
        self.request_with_headers(method, path, body, &headers).await
    }

    /// Make an HTTP request with extra headers.
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Most recent code mailed to `email`.
    pub async fn last_code(&self, email: &str) -> Option<String> {
        self.mailer
            .sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|(to, _)| to.eq_ignore_ascii_case(email))
            .map(|(_, code)| code.clone())
    }

    /// Request a code for `email`, log in with it and return the session token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request("POST", "/request_auth_code", Some(json!({ "email": email })), None)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let code = self.last_code(email).await.expect("No code mailed");
        let response = self
            .request(
                "POST",
                "/login",
                Some(json!({ "email": email, "code": code })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        response.body["session_token"]
            .as_str()
            .expect("No session token")
            .to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.allowlist_path);
    }
}
