//! Chat history commands

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use web::{format_server_timestamp, ClockStyle, HistoryEntry, Role};

use crate::session;
use crate::system_config::SystemConfig;
use crate::util;

/// Print the conversation with a leader
pub async fn run_show(config: &SystemConfig, leader: &str) -> Result<()> {
    let client = util::chat_client(config)?;
    let history = client.history(leader).await;
    session::persist(client.fetch_client())?;
    let history = history?;

    if history.is_empty() {
        println!("{}", format!("No history with {}", leader).dimmed());
        return Ok(());
    }

    for entry in &history {
        println!("{}", display_entry(entry, leader, config.display.clock));
    }
    Ok(())
}

/// Replace the conversation with entries read from a JSON file or stdin
pub async fn run_save(config: &SystemConfig, leader: &str, file: Option<&Path>) -> Result<()> {
    let raw = util::read_input(file)?;
    let history: Vec<HistoryEntry> =
        serde_json::from_str(&raw).context("History must be a JSON array of entries")?;

    let client = util::chat_client(config)?;
    let status = client.save_history(leader, &history).await;
    session::persist(client.fetch_client())?;
    let status = status?;
    if !status.is_success() {
        anyhow::bail!("Server did not accept history (status: {})", status.status);
    }

    println!("{} Saved {} entries for {}", "✓".green(), history.len(), leader.cyan());
    Ok(())
}

pub async fn run_clear(config: &SystemConfig, leader: &str) -> Result<()> {
    let client = util::chat_client(config)?;
    let status = client.clear_history(leader).await;
    session::persist(client.fetch_client())?;
    let status = status?;
    if !status.is_success() {
        anyhow::bail!("Server did not clear history (status: {})", status.status);
    }

    println!("{} Cleared history with {}", "✓".green(), leader.cyan());
    Ok(())
}

fn display_entry(entry: &HistoryEntry, leader: &str, clock: ClockStyle) -> String {
    let speaker = match entry.role {
        Role::User => "You".to_string(),
        Role::Leader => leader.to_string(),
    };
    let time = entry
        .timestamp
        .as_deref()
        .map(|ts| format_server_timestamp(ts, clock).unwrap_or_else(|_| ts.to_string()));

    match time {
        Some(time) => format!("[{}] {}: {}", time, speaker, entry.content),
        None => format!("{}: {}", speaker, entry.content),
    }
}
