#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use chatbridge::{build_router, AppState, BridgeConfig};
use http::{HeaderMap, StatusCode};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const REFERENCE_TEXT: &str = "public class LLMCharacter : MonoBehaviour\n{\n    public int contextSize = 8192;\n}\n";
pub const INDEX_HTML: &str = "<!doctype html>\n<html><body><div id=\"chat\"></div><script src=\"/static/app.js\"></script></body></html>\n";
pub const APP_JS: &str = "fetch('/chat', { method: 'POST' });\n";

/// Files the bridge needs on disk: reference document, index page and one static asset.
pub struct Fixture {
    pub root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("chatbridge-test-{}", uuid::Uuid::new_v4()));
        let static_dir = root.join("static");
        std::fs::create_dir_all(&static_dir).expect("create fixture dirs");
        std::fs::write(root.join("codebase.txt"), REFERENCE_TEXT).expect("write codebase");
        std::fs::write(static_dir.join("index.html"), INDEX_HTML).expect("write index");
        std::fs::write(static_dir.join("app.js"), APP_JS).expect("write asset");
        Fixture { root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let p = self.root.join(rel);
        std::fs::write(&p, contents).expect("write fixture file");
        p
    }

    /// Config pointing at this fixture and at `upstream_url`.
    pub fn config(&self, upstream_url: &str) -> BridgeConfig {
        BridgeConfig {
            api_key: "sk-or-test".to_string(),
            reference_path: self.root.join("codebase.txt"),
            static_dir: self.root.join("static"),
            index_file: self.root.join("static").join("index.html"),
            upstream_url: upstream_url.to_string(),
            no_proxy: true,
            ..BridgeConfig::default()
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// What the fake completion endpoint does with each request.
#[derive(Clone)]
pub enum UpstreamBehavior {
    /// Reply 200 with this JSON.
    Json(serde_json::Value),
    /// Reply with a status and JSON body.
    Status(StatusCode, serde_json::Value),
    /// Reply 200 with a non-JSON body.
    Text(String),
    /// Reply with the user message content as the completion.
    Echo,
    /// Sleep before replying with the JSON.
    Delay(Duration, serde_json::Value),
}

#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

struct StubState {
    behavior: UpstreamBehavior,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Captured>>>,
}

pub struct UpstreamStub {
    base_url: String,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Captured>>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl UpstreamStub {
    pub async fn start(behavior: UpstreamBehavior) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            behavior,
            calls: calls.clone(),
            requests: requests.clone(),
        });

        let router = Router::new()
            .route("/api/v1/chat/completions", post(completions))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream stub");
        let addr = listener.local_addr().expect("stub local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("Upstream stub error: {err:?}");
                    }
                }
                _ = rx => {}
            }
        });

        UpstreamStub {
            base_url: format!("http://{}", addr),
            calls,
            requests,
            shutdown: Mutex::new(Some(tx)),
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/api/v1/chat/completions", self.base_url)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn take_requests(&self) -> Vec<Captured> {
        let mut guard = self.requests.lock().expect("lock stub requests");
        guard.drain(..).collect()
    }
}

impl Drop for UpstreamStub {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shutdown.lock() {
            if let Some(tx) = guard.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn completions(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    state.calls.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut guard) = state.requests.lock() {
        guard.push(Captured {
            headers,
            body: body.clone(),
        });
    }

    match &state.behavior {
        UpstreamBehavior::Json(v) => Json(v.clone()).into_response(),
        UpstreamBehavior::Status(status, v) => (*status, Json(v.clone())).into_response(),
        UpstreamBehavior::Text(t) => (StatusCode::OK, t.clone()).into_response(),
        UpstreamBehavior::Echo => {
            let content = body["messages"][0]["content"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            Json(completion(&content)).into_response()
        }
        UpstreamBehavior::Delay(d, v) => {
            tokio::time::sleep(*d).await;
            Json(v.clone()).into_response()
        }
    }
}

/// A minimal successful chat-completion body.
pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "gen-test",
        "model": "google/gemini-2.0-flash-thinking-exp:free",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

/// URL of a local port with nothing listening on it.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{}/api/v1/chat/completions", addr)
}

/// The bridge bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub addr: SocketAddr,
    join: JoinHandle<()>,
    client: reqwest::Client,
}

impl TestServer {
    fn make_client() -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .no_proxy()
            .build()
            .expect("failed building reqwest client")
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    pub async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
    }

    pub async fn post_bytes(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(http::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
    }

    /// POST `/chat` and return status plus parsed JSON body.
    pub async fn chat(&self, message: &str) -> (StatusCode, serde_json::Value) {
        let resp = self
            .post_json("/chat", &serde_json::json!({ "message": message }))
            .await
            .expect("chat request");
        let status = resp.status();
        let body = resp.json().await.expect("chat reply is JSON");
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Spawn the bridge router for `config` on an ephemeral port.
pub async fn spawn_bridge(config: &BridgeConfig) -> TestServer {
    let state = AppState::from_config(config).expect("app state");
    let app = build_router(Arc::new(state));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{}", addr);
    let server = axum::serve(listener, app.into_make_service());

    let join = tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("Test server error: {e:?}");
        }
    });

    TestServer {
        base_url,
        addr,
        join,
        client: TestServer::make_client(),
    }
}

/// Read a fixture file back, for byte-exact comparisons.
pub fn read_bytes(p: &Path) -> Vec<u8> {
    std::fs::read(p).expect("read fixture")
}
