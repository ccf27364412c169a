// Shared bootstrapping for integration tests: a proxy on an ephemeral port and
// a mock realtime upstream that records every call it receives.
#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::post,
};
use futures::stream::{self, StreamExt};
use realtime_token_proxy::Config;
use realtime_token_proxy::interface_adapters::clients::realtime::RealtimeSettings;
use serde_json::Value;
use std::{
    net::{IpAddr, Ipv4Addr},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "s3cret";
pub const API_KEY: &str = "test-api-key";
pub const WEBRTC_URL: &str = "https://example.test/v1/realtime";

// What the mock upstream saw on its last call.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<RecordedRequest>>>,
    status: StatusCode,
    body: Value,
    delay: Duration,
}

pub struct MockUpstream {
    pub sessions_url: String,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request
            .lock()
            .expect("mock mutex poisoned")
            .clone()
    }
}

async fn create_session(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let api_key = headers
        .get("api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    *state.last_request.lock().expect("mock mutex poisoned") =
        Some(RecordedRequest { api_key, body });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (state.status, Json(state.body.clone()))
}

// Start a mock upstream answering every session request with `status` and `body`.
pub async fn spawn_mock_upstream(status: StatusCode, body: Value) -> MockUpstream {
    spawn_mock_upstream_with_delay(status, body, Duration::ZERO).await
}

pub async fn spawn_mock_upstream_with_delay(
    status: StatusCode,
    body: Value,
    delay: Duration,
) -> MockUpstream {
    let calls = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(None));
    let state = MockState {
        calls: calls.clone(),
        last_request: last_request.clone(),
        status,
        body,
        delay,
    };
    let app = Router::new()
        .route("/openai/realtime/sessions", post(create_session))
        .with_state(state);

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream port");
    let addr = listener.local_addr().expect("get mock upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream failed");
    });

    MockUpstream {
        sessions_url: format!("http://{addr}/openai/realtime/sessions"),
        calls,
        last_request,
    }
}

// Start a mock upstream that answers with `status`, sends one body chunk and
// then never finishes the body.
pub async fn spawn_stalled_upstream(status: StatusCode) -> MockUpstream {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        "/openai/realtime/sessions",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let chunks = stream::once(async {
                    Ok::<_, std::io::Error>(Bytes::from_static(b"partial"))
                })
                .chain(stream::pending());
                Response::builder()
                    .status(status)
                    .body(Body::from_stream(chunks))
                    .expect("build stalled response")
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream port");
    let addr = listener.local_addr().expect("get mock upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream failed");
    });

    MockUpstream {
        sessions_url: format!("http://{addr}/openai/realtime/sessions"),
        calls,
        last_request: Arc::new(Mutex::new(None)),
    }
}

pub fn test_config(sessions_url: Option<String>) -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        valid_username: Some(USERNAME.to_string()),
        valid_password: Some(PASSWORD.to_string()),
        realtime: RealtimeSettings {
            sessions_url,
            api_key: Some(API_KEY.to_string()),
            deployment: "gpt-realtime".to_string(),
            voice: "verse".to_string(),
        },
        webrtc_url: Some(WEBRTC_URL.to_string()),
        session_ttl: Duration::from_secs(24 * 60 * 60),
        upstream_timeout: Duration::from_secs(5),
        session_sweep_interval: None,
    }
}

// Start the proxy with `config` and return its base URL.
pub async fn spawn_server(config: Config) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        realtime_token_proxy::run(listener, config)
            .await
            .expect("server failed");
    });
    format!("http://{addr}")
}

// Log in with the test credentials and return the session token.
pub async fn login(client: &reqwest::Client, base_url: &str) -> String {
    let res = client
        .post(format!("{base_url}/api/login"))
        .json(&serde_json::json!({ "username": USERNAME, "password": PASSWORD }))
        .send()
        .await
        .expect("login request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let payload: Value = res.json().await.expect("login body should be json");
    payload["sessionToken"]
        .as_str()
        .expect("login should return a sessionToken")
        .to_string()
}

pub async fn get_token(
    client: &reqwest::Client,
    base_url: &str,
    token: Option<&str>,
) -> reqwest::Response {
    let mut req = client.post(format!("{base_url}/api/get-token"));
    if let Some(token) = token {
        req = req.header("x-session-token", token);
    }
    req.send().await.expect("get-token request should succeed")
}
