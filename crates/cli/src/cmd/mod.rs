//! CLI command implementations

pub mod chat;
pub mod config;
pub mod fetch;
pub mod history;
pub mod preview;
pub mod render;
pub mod time;
