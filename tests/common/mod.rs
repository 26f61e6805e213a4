//! In-process stand-in for the Java2UML server.
//!
//! Every request is answered from a per-route script of replies. The last
//! reply of a script repeats forever. Requests are recorded so tests can
//! count hits per route and inspect what was sent.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use java2uml::ClientConfig;

const API_PREFIX: &str = "/api";

pub fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/responses")
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(testdata_path().join(name)).expect("fixture should exist")
}

/// Fixture parsed as JSON, for tests that tweak a field before serving it.
pub fn fixture_json(name: &str) -> serde_json::Value {
    serde_json::from_str(&fixture(name)).expect("fixture should be valid JSON")
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
}

impl Reply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "application/hal+json",
        }
    }

    /// 200 with the named fixture as body.
    pub fn fixture(name: &str) -> Self {
        Self::json(200, fixture(name))
    }

    /// 202 with an empty body: still computing.
    pub fn accepted() -> Self {
        Self {
            status: 202,
            body: String::new(),
            content_type: "text/plain",
        }
    }

    pub fn text(status: u16, body: impl Into<String>, content_type: &'static str) -> Self {
        Self {
            status,
            body: body.into(),
            content_type,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::text(status, "", "text/plain")
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below the `/api` prefix, e.g. `/project-info/7`
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct ServerState {
    scripts: HashMap<String, VecDeque<Reply>>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone)]
pub struct StubServer {
    pub base_url: String,
    state: Arc<Mutex<ServerState>>,
}

fn route_key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

impl StubServer {
    pub async fn start() -> Self {
        // A proxy configured in the environment must not intercept loopback traffic.
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        std::env::set_var("no_proxy", "127.0.0.1,localhost");

        let state = Arc::new(Mutex::new(ServerState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind a local port");
        let addr = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server failed");
        });

        Self {
            base_url: format!("http://{}{}", addr, API_PREFIX),
            state,
        }
    }

    /// Client configuration pointing at this server, with a short poll delay.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(5))
            .with_poll_delay(Duration::from_millis(20))
    }

    /// Script the replies for `method path`, replacing any earlier script.
    pub fn on(&self, method: Method, path: &str, replies: Vec<Reply>) -> &Self {
        assert!(!replies.is_empty(), "a script needs at least one reply");
        let mut state = self.state.lock().unwrap();
        state
            .scripts
            .insert(route_key(&method, path), replies.into_iter().collect());
        self
    }

    pub fn on_get(&self, path: &str, reply: Reply) -> &Self {
        self.on(Method::GET, path, vec![reply])
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Serve a successful upload of `project_info.json` with the given id.
    pub fn accept_upload_as(&self, project_id: i64) -> &Self {
        let mut info = fixture_json("project_info.json");
        info["id"] = project_id.into();
        self.on(Method::POST, "/files", vec![Reply::json(201, info.to_string())])
    }
}

async fn handle(
    State(state): State<Arc<Mutex<ServerState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();

    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            headers,
            body,
        });
        match state.scripts.get_mut(&route_key(&method, &path)) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => None,
        }
    };

    match reply {
        Some(reply) => (
            StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, reply.content_type)],
            reply.body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, format!("no script for {method} {path}")).into_response(),
    }
}
