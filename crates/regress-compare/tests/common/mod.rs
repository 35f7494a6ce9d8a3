//! Local stand-ins for the OAuth2 token endpoint and the two analysis servers

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Json, Router};
use regress_compare::RunPaths;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const ACCESS_TOKEN: &str = "tok-123";
pub const CLIENT_SECRET: &str = "s3cr3t";

/// Serve `router` on an ephemeral loopback port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// POST /oauth2/token accepting only the expected client credentials
pub async fn spawn_token_server() -> String {
    async fn token(Form(form): Form<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
            && form.get("client_id").map(String::as_str) == Some("regress-bot")
            && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET)
            && form.get("scope").map(String::as_str) == Some("analyses");

        if valid {
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": ACCESS_TOKEN,
                    "token_type": "Bearer",
                    "expires_in": 3600
                })),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid_client"})),
            )
        }
    }

    spawn(Router::new().route("/oauth2/token", post(token))).await
}

/// POST /oauth2/token answering 200 with `body`, whatever the credentials
pub async fn spawn_token_server_replying(body: Value) -> String {
    spawn(Router::new().route(
        "/oauth2/token",
        post(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    ))
    .await
}

/// Analysis server answering a canned status and body, counting hits
#[derive(Clone)]
pub struct Backend {
    reply: Arc<Mutex<(StatusCode, String)>>,
    hits: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
    last_payload: Arc<Mutex<Option<Value>>>,
    watched: Arc<Mutex<Option<PathBuf>>>,
    snapshots: Arc<Mutex<Vec<Option<Value>>>>,
}

impl Backend {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new((
                StatusCode::from_u16(status).unwrap(),
                body.to_string(),
            ))),
            hits: Arc::new(AtomicUsize::new(0)),
            last_auth: Arc::new(Mutex::new(None)),
            last_payload: Arc::new(Mutex::new(None)),
            watched: Arc::new(Mutex::new(None)),
            snapshots: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, &body.to_string())
    }

    pub fn set_reply(&self, status: u16, body: Value) {
        *self.reply.lock().unwrap() = (StatusCode::from_u16(status).unwrap(), body.to_string());
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.last_payload.lock().unwrap().clone()
    }

    /// Read `path` on every hit, before answering
    pub fn watch_file(&self, path: &Path) {
        *self.watched.lock().unwrap() = Some(path.to_path_buf());
    }

    /// Contents of the watched file at each hit; `None` when it did not exist
    pub fn snapshots(&self) -> Vec<Option<Value>> {
        self.snapshots.lock().unwrap().clone()
    }

    pub async fn spawn(&self) -> String {
        async fn analyses(
            State(backend): State<Backend>,
            headers: HeaderMap,
            Json(payload): Json<Value>,
        ) -> (StatusCode, String) {
            backend.hits.fetch_add(1, Ordering::SeqCst);
            *backend.last_auth.lock().unwrap() = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            *backend.last_payload.lock().unwrap() = Some(payload);
            let watched = backend.watched.lock().unwrap().clone();
            if let Some(path) = watched {
                let snapshot = std::fs::read_to_string(&path)
                    .ok()
                    .map(|content| serde_json::from_str(&content).unwrap());
                backend.snapshots.lock().unwrap().push(snapshot);
            }
            backend.reply.lock().unwrap().clone()
        }

        spawn(
            Router::new()
                .route("/api/analyses", post(analyses))
                .with_state(self.clone()),
        )
        .await
    }
}

/// Temporary directory holding the config, fixtures and results files
pub struct Workspace {
    pub dir: TempDir,
    pub paths: RunPaths,
}

impl Workspace {
    pub fn new(config_yaml: &str, use_cases: &Value) -> Self {
        let dir = TempDir::new().unwrap();
        let paths = RunPaths {
            config: dir.path().join("config.yaml"),
            use_cases: dir.path().join("usecases.json"),
            results: dir.path().join("results.json"),
        };
        std::fs::write(&paths.config, config_yaml).unwrap();
        write_json(&paths.use_cases, use_cases);
        Self { dir, paths }
    }

    pub fn results(&self) -> Value {
        read_json(&self.paths.results)
    }

    pub fn fixtures(&self) -> Value {
        read_json(&self.paths.use_cases)
    }
}

pub fn config_yaml(token_base: &str, url_ref: &str, url_version: &str) -> String {
    format!(
        "token_url: {token_base}/oauth2/token\n\
         client_id: regress-bot\n\
         client_secret: {CLIENT_SECRET}\n\
         scope: analyses\n\
         url_ref: {url_ref}\n\
         url_version: {url_version}\n\
         timeout_secs: 5\n"
    )
}

pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
