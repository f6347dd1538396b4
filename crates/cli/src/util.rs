//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;
use web::{ChatClient, FetchClient};

use crate::session;
use crate::system_config::SystemConfig;

/// HTTP client configured from `[api]`, carrying the stored session cookies
pub fn fetch_client(config: &SystemConfig) -> Result<FetchClient> {
    let base_url = Url::parse(&config.api.base_url)
        .with_context(|| format!("api.base_url is not a valid URL: {}", config.api.base_url))?;
    let cookies = session::restore(&base_url)?;

    FetchClient::with_cookie_jar(
        base_url.as_str(),
        Duration::from_secs(config.api.timeout_secs),
        cookies,
    )
    .context("Failed to create HTTP client")
}

pub fn chat_client(config: &SystemConfig) -> Result<ChatClient> {
    Ok(ChatClient::new(fetch_client(config)?))
}

/// Spinner on stderr while a request is in flight
///
/// Hidden automatically when stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Read a file, or stdin when no path (or `-`) is given
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Parse a `Name: value` header argument
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("Invalid header '{}': expected 'Name: value'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Invalid header '{}': empty name", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}
