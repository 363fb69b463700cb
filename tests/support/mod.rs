#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&str, &str) -> String + Send + Sync;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub namespace: String,
    pub key: String,
    pub cache_control: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    respond: Arc<Responder>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the remote counter service.
pub struct FakeCounterApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeCounterApi {
    /// `respond` receives the endpoint and the key and returns the raw body.
    pub async fn start(respond: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            respond: Arc::new(respond),
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/:endpoint/:namespace/:key", get(answer))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake counter api");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn answer(
    State(state): State<FakeState>,
    Path((endpoint, namespace, key)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> String {
    let body = (state.respond)(&endpoint, &key);
    state.requests.lock().unwrap().push(RecordedRequest {
        endpoint,
        namespace,
        key,
        cache_control: headers
            .get("cache-control")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    });
    body
}

/// Base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn today_key() -> String {
    format!("daily-{}", chrono::Utc::now().date_naive().format("%Y-%m-%d"))
}

pub const COUNTER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="countapi-namespace" content="blog.example.org" />
  <title>Visits</title>
</head>
<body>
  <footer>
    <span data-count="total">…</span> visits,
    <span data-count="today">…</span> today
  </footer>
</body>
</html>
"#;
