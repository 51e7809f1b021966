use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{OriginalUri, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::runtime::Runtime;

struct Reply {
    status: StatusCode,
    body: String,
    next_page: String,
}

/// Canned responses keyed by request path and page number.
#[derive(Default)]
pub struct Routes {
    replies: HashMap<(String, u32), Reply>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, path: &str, body: Value) -> Self {
        self.page(path, 1, body, None)
    }

    pub fn page(self, path: &str, page: u32, body: Value, next_page: Option<u32>) -> Self {
        let cursor = next_page.map(|n| n.to_string()).unwrap_or_default();
        self.cursor(path, page, body, &cursor)
    }

    /// Like [`Routes::page`] with the `X-Next-Page` value given verbatim.
    pub fn cursor(mut self, path: &str, page: u32, body: Value, next_page: &str) -> Self {
        self.replies.insert(
            (format!("/api/v4{path}"), page),
            Reply {
                status: StatusCode::OK,
                body: body.to_string(),
                next_page: next_page.to_string(),
            },
        );
        self
    }

    pub fn status(mut self, path: &str, status: u16, message: &str) -> Self {
        self.replies.insert(
            (format!("/api/v4{path}"), 1),
            Reply {
                status: StatusCode::from_u16(status).expect("valid status"),
                body: json!({ "message": message }).to_string(),
                next_page: String::new(),
            },
        );
        self
    }
}

struct Shared {
    routes: Routes,
    requests: Mutex<Vec<String>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

/// GitLab API stand-in answering from [`Routes`] on its own runtime.
pub struct FakeGitLab {
    pub base_url: String,
    shared: Arc<Shared>,
    _runtime: Runtime,
}

impl FakeGitLab {
    pub fn start(routes: Routes) -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
        listener.set_nonblocking(true).expect("set nonblocking");
        let port = listener.local_addr().expect("local addr").port();

        let shared = Arc::new(Shared {
            routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(reply)
            .with_state(Arc::clone(&shared));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build runtime");
        runtime.spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            shared,
            _runtime: runtime,
        }
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.shared.requests.lock().expect("requests lock").clone()
    }
}

async fn reply(
    State(shared): State<Arc<Shared>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    shared
        .requests
        .lock()
        .expect("requests lock")
        .push(uri.to_string());

    if !headers.contains_key("private-token") {
        return json_reply(StatusCode::UNAUTHORIZED, r#"{"message":"401 Unauthorized"}"#, "");
    }

    let key = (uri.path().to_string(), query.page.unwrap_or(1));
    match shared.routes.replies.get(&key) {
        Some(found) => json_reply(found.status, &found.body, &found.next_page),
        None => json_reply(StatusCode::NOT_FOUND, r#"{"message":"404 Not found"}"#, ""),
    }
}

fn json_reply(status: StatusCode, body: &str, next_page: &str) -> Response {
    (
        status,
        [
            ("content-type", "application/json".to_string()),
            ("x-next-page", next_page.to_string()),
        ],
        body.to_string(),
    )
        .into_response()
}
