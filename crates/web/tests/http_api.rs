//! Fetch wrapper and chat client against an in-process HTTP server

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use web::{
    ChatClient, CookieStore, FetchClient, FetchError, HistoryEntry, Jar, RequestOptions, Role,
};

const SESSION_COOKIE: &str = "session";

/// Histories live in a cookie-keyed session, the way the chat back end
/// stores them
#[derive(Clone, Default)]
struct AppState {
    sessions: Arc<Mutex<HashMap<String, HashMap<String, Vec<Value>>>>>,
    next_session: Arc<AtomicU64>,
}

impl AppState {
    /// Session named by the request cookie, or a fresh one
    fn session_for(&self, headers: &HeaderMap) -> String {
        session_cookie(headers)
            .unwrap_or_else(|| format!("s{}", self.next_session.fetch_add(1, Ordering::SeqCst)))
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn set_session(id: &str) -> [(HeaderName, String); 1] {
    [(SET_COOKIE, format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly"))]
}

async fn chat(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let message = body["message"].as_str().unwrap_or_default();
    let leader = body["leader_name"].as_str().unwrap_or_default();

    if message == "fail" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "model unavailable" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "response": format!("{leader} says: {message}"),
            "timestamp": "2024-01-03 14:30:00"
        })),
    )
}

async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leader): Path<String>,
) -> Json<Value> {
    let history = match session_cookie(&headers) {
        Some(id) => state
            .sessions
            .lock()
            .await
            .get(&id)
            .and_then(|session| session.get(&leader))
            .cloned(),
        None => None,
    };
    Json(Value::Array(history.unwrap_or_default()))
}

async fn save_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leader): Path<String>,
    Json(body): Json<Value>,
) -> ([(HeaderName, String); 1], Json<Value>) {
    let id = state.session_for(&headers);
    let history = body["history"].as_array().cloned().unwrap_or_default();
    state
        .sessions
        .lock()
        .await
        .entry(id.clone())
        .or_default()
        .insert(leader, history);
    (set_session(&id), Json(json!({ "status": "success" })))
}

async fn clear_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(leader): Path<String>,
) -> ([(HeaderName, String); 1], Json<Value>) {
    let id = state.session_for(&headers);
    if let Some(session) = state.sessions.lock().await.get_mut(&id) {
        session.remove(&leader);
    }
    (set_session(&id), Json(json!({ "status": "success" })))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "content_type": header(CONTENT_TYPE.as_str()),
        "x_trace": header("x-trace"),
    }))
}

fn app() -> Router {
    Router::new()
        .route("/api/ok", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/api/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/api/text", get(|| async { "plain text" }))
        .route("/api/headers", get(echo_headers).post(echo_headers))
        .route("/api/chat", post(chat))
        .route(
            "/api/chat_history/:leader",
            get(get_history).post(save_history).delete(clear_history),
        )
        .with_state(AppState::default())
}

/// Serve the test app on an ephemeral port and return its base URL
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> FetchClient {
    FetchClient::with_base_url(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_json() {
    let base = spawn_server().await;
    let value: Value = client(&base)
        .fetch_api("/api/ok", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(value, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_absolute_endpoint_without_base() {
    let base = spawn_server().await;
    let fetch = FetchClient::new(Duration::from_secs(5)).unwrap();
    let value: Value = fetch
        .fetch_api(&format!("{base}/api/ok"), RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_http_error_status() {
    let base = spawn_server().await;
    let err = client(&base)
        .fetch_api::<Value>("/api/missing", RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "API request failed: HTTP error! status: 404");
}

#[tokio::test]
async fn test_default_content_type_sent() {
    let base = spawn_server().await;
    let value: Value = client(&base)
        .fetch_api("/api/headers", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(value["content_type"], "application/json");
    assert_eq!(value["x_trace"], Value::Null);
}

#[tokio::test]
async fn test_caller_headers_override() {
    let base = spawn_server().await;
    let options = RequestOptions::post(json!({ "ping": true }))
        .header("Content-Type", "application/json; charset=utf-8")
        .header("X-Trace", "abc123");
    let value: Value = client(&base).fetch_api("/api/headers", options).await.unwrap();

    assert_eq!(value["content_type"], "application/json; charset=utf-8");
    assert_eq!(value["x_trace"], "abc123");
}

#[tokio::test]
async fn test_non_json_body_is_wrapped() {
    let base = spawn_server().await;
    let err = client(&base)
        .fetch_api::<Value>("/api/text", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
    assert!(err.to_string().starts_with("API request failed: "));
}

#[tokio::test]
async fn test_connection_failure_is_wrapped() {
    // Grab a free port, then close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .fetch_api::<Value>("/api/ok", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(err.to_string().starts_with("API request failed: "));
}

#[tokio::test]
async fn test_send_message() {
    let base = spawn_server().await;
    let chat = ChatClient::new(client(&base));

    let reply = chat.send_message("Lincoln", "Hello").await.unwrap();
    assert_eq!(reply.response, "Lincoln says: Hello");
    assert_eq!(reply.timestamp, "2024-01-03 14:30:00");
}

#[tokio::test]
async fn test_send_message_server_error() {
    let base = spawn_server().await;
    let chat = ChatClient::new(client(&base));

    let err = chat.send_message("Lincoln", "fail").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_history_lifecycle() {
    let base = spawn_server().await;
    let chat = ChatClient::new(client(&base));
    let leader = "Abraham Lincoln";

    assert!(chat.history(leader).await.unwrap().is_empty());

    let history = vec![
        HistoryEntry {
            role: Role::User,
            content: "Hello".to_string(),
            timestamp: Some("2024-01-03 14:30:00".to_string()),
        },
        HistoryEntry {
            role: Role::Leader,
            content: "Four score and seven years ago".to_string(),
            timestamp: None,
        },
    ];
    let status = chat.save_history(leader, &history).await.unwrap();
    assert!(status.is_success());

    assert_eq!(chat.history(leader).await.unwrap(), history);
    assert!(chat.history("Someone Else").await.unwrap().is_empty());

    assert!(chat.clear_history(leader).await.unwrap().is_success());
    assert!(chat.history(leader).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_needs_session_cookie() {
    let base = spawn_server().await;
    let chat = ChatClient::new(client(&base));
    let entry = HistoryEntry {
        role: Role::User,
        content: "hi".to_string(),
        timestamp: None,
    };
    chat.save_history("Lincoln", &[entry.clone()]).await.unwrap();

    // Same client sends the session cookie back
    assert_eq!(chat.history("Lincoln").await.unwrap(), vec![entry]);

    // A client with its own empty jar lands in a fresh session
    let stranger = ChatClient::new(client(&base));
    assert!(stranger.history("Lincoln").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shared_cookie_jar_keeps_session() {
    let base = spawn_server().await;
    let jar = Arc::new(Jar::default());
    let entry = HistoryEntry {
        role: Role::Leader,
        content: "With malice toward none".to_string(),
        timestamp: None,
    };

    let first = ChatClient::new(
        FetchClient::with_cookie_jar(&base, Duration::from_secs(5), Arc::clone(&jar)).unwrap(),
    );
    first.save_history("Lincoln", &[entry.clone()]).await.unwrap();

    let url = first.fetch_client().base_url().unwrap().clone();
    let cookies = jar.cookies(&url).unwrap();
    assert!(cookies.to_str().unwrap().starts_with("session="));

    let second = ChatClient::new(
        FetchClient::with_cookie_jar(&base, Duration::from_secs(5), Arc::clone(&jar)).unwrap(),
    );
    assert_eq!(second.history("Lincoln").await.unwrap(), vec![entry]);
}
