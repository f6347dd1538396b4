//! In-process chat back end for end-to-end tests
//!
//! Only the history routes are served. History is stored per session
//! cookie, so a client that forgets its cookies sees an empty history.

use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

type Sessions = HashMap<String, HashMap<String, Vec<Value>>>;

#[derive(Clone, Default)]
struct AppState {
    sessions: Arc<Mutex<Sessions>>,
    next_session: Arc<AtomicU64>,
}

/// Running server; stops when dropped
pub struct ChatServer {
    pub base_url: String,
    _runtime: Runtime,
}

impl ChatServer {
    pub fn start() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let listener = runtime.block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))?;
        let addr = listener.local_addr()?;
        runtime.spawn(async move {
            let _ = axum::serve(listener, app()).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            _runtime: runtime,
        })
    }
}

fn app() -> Router {
    Router::new()
        .route(
            "/api/chat_history/:leader",
            get(get_history).post(save_history),
        )
        .with_state(AppState::default())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "session")
        .map(|(_, value)| value.to_string())
}

async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leader): Path<String>,
) -> Json<Value> {
    let history = session_cookie(&headers).and_then(|id| {
        let sessions = state.sessions.lock().unwrap();
        sessions.get(&id).and_then(|s| s.get(&leader)).cloned()
    });
    Json(Value::Array(history.unwrap_or_default()))
}

async fn save_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leader): Path<String>,
    Json(body): Json<Value>,
) -> ([(HeaderName, String); 1], Json<Value>) {
    let id = session_cookie(&headers)
        .unwrap_or_else(|| format!("s{}", state.next_session.fetch_add(1, Ordering::SeqCst)));
    let history = body["history"].as_array().cloned().unwrap_or_default();
    state
        .sessions
        .lock()
        .unwrap()
        .entry(id.clone())
        .or_default()
        .insert(leader, history);

    (
        [(SET_COOKIE, format!("session={id}; Path=/; HttpOnly"))],
        Json(json!({ "status": "success" })),
    )
}
