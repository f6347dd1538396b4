//! Typed client for the chat back end
//!
//! Endpoints:
//! - `POST /api/chat` → generated reply
//! - `GET|POST|DELETE /api/chat_history/<leader>` → per-leader history
//!
//! History lives in the server's cookie-backed session, so it is only
//! visible to a client that sends the same session cookie back.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::fetch::{FetchClient, FetchError, RequestOptions};

/// Who wrote a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Leader,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    leader_name: &'a str,
}

/// Reply to `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// `%Y-%m-%d %H:%M:%S` in the server's local time
    pub timestamp: String,
}

/// `{ "status": "success" }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    pub status: String,
}

impl StatusReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Chat API client
#[derive(Debug, Clone)]
pub struct ChatClient {
    fetch: FetchClient,
}

impl ChatClient {
    /// The fetch client needs a base URL pointing at the chat server
    pub fn new(fetch: FetchClient) -> Self {
        Self { fetch }
    }

    /// Underlying HTTP client (and its session cookies)
    pub fn fetch_client(&self) -> &FetchClient {
        &self.fetch
    }

    /// Send a message to a leader and wait for the reply
    pub async fn send_message(&self, leader: &str, message: &str) -> Result<ChatReply, FetchError> {
        let body = serde_json::to_value(ChatRequest {
            message,
            leader_name: leader,
        })
        .map_err(FetchError::Encode)?;

        self.fetch
            .fetch_api("/api/chat", RequestOptions::post(body))
            .await
    }

    /// Stored conversation with a leader (empty if none)
    pub async fn history(&self, leader: &str) -> Result<Vec<HistoryEntry>, FetchError> {
        let url = self.history_url(leader)?;
        self.fetch.fetch_url(url, RequestOptions::get()).await
    }

    /// Replace the stored conversation with a leader
    pub async fn save_history(
        &self,
        leader: &str,
        history: &[HistoryEntry],
    ) -> Result<StatusReply, FetchError> {
        let url = self.history_url(leader)?;
        let body = json!({ "history": history });
        self.fetch.fetch_url(url, RequestOptions::post(body)).await
    }

    /// Forget the conversation with a leader
    pub async fn clear_history(&self, leader: &str) -> Result<StatusReply, FetchError> {
        let url = self.history_url(leader)?;
        self.fetch.fetch_url(url, RequestOptions::delete()).await
    }

    /// `/api/chat_history/<leader>` with the name as one encoded segment
    fn history_url(&self, leader: &str) -> Result<url::Url, FetchError> {
        let mut url = self.fetch.resolve("/api/chat_history")?;
        let endpoint = url.to_string();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidEndpoint {
                endpoint,
                reason: "URL cannot have path segments".to_string(),
            })?
            .push(leader);
        Ok(url)
    }
}
