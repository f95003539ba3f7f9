#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use bookmark_api::auth::LocalIdentityProvider;
use bookmark_api::database::MemoryStore;
use bookmark_api::{router, AppState};

pub const PASSWORD: &str = "secret1";

/// Fresh in-memory store and local identity provider
pub fn test_state() -> AppState {
    let identity = LocalIdentityProvider::new("integration-test-secret", 1)
        .expect("identity provider")
        .with_hash_cost(4);
    AppState::new(Arc::new(MemoryStore::new()), Arc::new(identity))
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (router(state.clone()), state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// Drive one request through the router in-process
pub async fn call(app: &Router, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };

    Ok(TestResponse { status, headers, body })
}

pub async fn get(app: &Router, path: &str, token: &str) -> Result<TestResponse> {
    call(app, Method::GET, path, Some(token), None).await
}

pub async fn post(app: &Router, path: &str, token: &str, body: Value) -> Result<TestResponse> {
    call(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn put(app: &Router, path: &str, token: &str, body: Value) -> Result<TestResponse> {
    call(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, path: &str, token: &str) -> Result<TestResponse> {
    call(app, Method::DELETE, path, Some(token), None).await
}

/// Sign up and return the access token
pub async fn signup(app: &Router, email: &str) -> Result<String> {
    let res = call(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": email, "password": PASSWORD })),
    )
    .await?;
    anyhow::ensure!(res.status == StatusCode::OK, "signup failed: {} {}", res.status, res.body);

    res.body["session"]["accessToken"]
        .as_str()
        .map(str::to_string)
        .context("signup returned no access token")
}

pub async fn create_collection(app: &Router, token: &str, name: &str) -> Result<String> {
    let res = post(app, "/api/collections", token, serde_json::json!({ "name": name })).await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "create collection failed: {}", res.body);
    res.body["id"].as_str().map(str::to_string).context("collection without id")
}

pub async fn create_bookmark(app: &Router, token: &str, body: Value) -> Result<String> {
    let res = post(app, "/api/bookmarks", token, body).await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "create bookmark failed: {}", res.body);
    res.body["id"].as_str().map(str::to_string).context("bookmark without id")
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Serve a fresh application on an unused local port
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);
    let state = test_state();

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test server")?;
    let app = router(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer { port, base_url, state };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}
