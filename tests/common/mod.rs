#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use impronta_backoffice::config::AppConfig;
use impronta_backoffice::models::LoginRequest;
use impronta_backoffice::session::MemorySessionStorage;
use impronta_backoffice::Backoffice;

/// Base path every request is expected under; stripped before matching.
const BASE_PATH: &str = "/impronta/studentesca/official/api/";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path relative to the API base, e.g. `admin/dipartimento`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct Shared {
    replies: Mutex<HashMap<(String, String), Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

/// In-process fake of the remote API: canned replies per method and path,
/// every request recorded.
pub struct FakeBackend {
    pub base_url: String,
    shared: Arc<Shared>,
}

async fn dispatch(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(BASE_PATH)
        .unwrap_or(uri.path())
        .trim_end_matches('/')
        .to_string();
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    let reply = shared
        .replies
        .lock()
        .unwrap()
        .get(&(method.to_string(), path.clone()))
        .cloned();

    match reply {
        Some(reply) => {
            if let Some(delay) = reply.delay {
                tokio::time::sleep(delay).await;
            }
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("no fake reply for {} {}", method, path)).into_response(),
    }
}

impl FakeBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let shared = Arc::new(Shared::default());

        let router = Router::new().fallback(dispatch).with_state(shared.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            shared,
        })
    }

    fn set(&self, method: &str, path: &str, reply: Reply) {
        self.shared
            .replies
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), reply);
    }

    pub fn reply(&self, method: &str, path: &str, status: u16, body: Value) {
        self.set(
            method,
            path,
            Reply {
                status,
                body: body.to_string(),
                delay: None,
            },
        );
    }

    /// Plain `200` with an empty body.
    pub fn ok(&self, method: &str, path: &str) {
        self.set(
            method,
            path,
            Reply {
                status: 200,
                body: String::new(),
                delay: None,
            },
        );
    }

    pub fn reply_after(&self, method: &str, path: &str, delay: Duration, body: Value) {
        self.set(
            method,
            path,
            Reply {
                status: 200,
                body: body.to_string(),
                delay: Some(delay),
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.shared.requests.lock().unwrap().clear();
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::development().with_host(self.base_url.clone())
    }

    pub fn app(&self) -> Result<Backoffice> {
        self.app_with_storage(MemorySessionStorage::new())
    }

    pub fn app_with_storage(&self, storage: MemorySessionStorage) -> Result<Backoffice> {
        Ok(Backoffice::new(&self.config(), Box::new(storage))?)
    }

    /// A fresh app logged in as user `id` with `roles`.
    pub async fn logged_in(&self, id: i64, roles: &[&str]) -> Result<Backoffice> {
        self.reply("POST", "auth/login", 200, session_json(id, roles));
        let app = self.app()?;
        app.auth()
            .login(&LoginRequest::new("anna@uni.it", "secret"))
            .await?;
        self.clear_requests();
        Ok(app)
    }
}

pub fn session_json(id: i64, roles: &[&str]) -> Value {
    json!({
        "id": id,
        "nome": "Anna",
        "cognome": "Bianchi",
        "email": "anna@uni.it",
        "ruoli": roles,
        "token": format!("token-{}", id)
    })
}

pub fn department(id: i64, name: &str, code: &str) -> Value {
    json!({ "id": id, "nome": name, "codice": code })
}

pub fn course(id: i64, name: &str, department_id: i64) -> Value {
    json!({
        "id": id,
        "nome": name,
        "tipoCorso": "TRIENNALE",
        "dipartimento": { "id": department_id, "nome": format!("Dip {}", department_id), "codice": format!("D{}", department_id) }
    })
}

/// Let spawned tasks (the deferred login redirect) run.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}
