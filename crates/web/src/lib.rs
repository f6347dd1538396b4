//! Front-end helpers for the Parley chat client
//!
//! This crate provides:
//! - Clock-style timestamp formatting
//! - Error-to-display rendering with optional alert mounting
//! - A JSON-over-HTTP fetch wrapper
//! - Element construction and a small in-memory document
//! - A minimal markdown-to-HTML transform
//! - A typed client for the chat back end

pub mod chat;
pub mod element;
pub mod error_display;
pub mod fetch;
pub mod markdown;
pub mod timestamp;

// Re-exports
pub use chat::{ChatClient, ChatReply, HistoryEntry, Role, StatusReply};
pub use element::{create_element, Document, Element, ElementError};
pub use error_display::{error_message, handle_error, handle_error_in, FALLBACK_MESSAGE};
pub use fetch::{FetchClient, FetchError, RequestOptions};
pub use reqwest::cookie::{CookieStore, Jar};
pub use reqwest::Method;
pub use markdown::{parse_markdown, parse_markdown_escaped};
pub use timestamp::{
    format_now, format_server_timestamp, format_timestamp, format_unix_millis, ClockStyle,
    TimestampError,
};
