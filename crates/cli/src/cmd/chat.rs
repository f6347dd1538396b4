//! Send a chat message

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::warn;
use web::format_server_timestamp;

use crate::session;
use crate::system_config::SystemConfig;
use crate::util;

pub async fn run(config: &SystemConfig, leader: &str, message: &str) -> Result<()> {
    let client = util::chat_client(config)?;

    let spinner = util::spinner(format!("{} is thinking...", leader));
    let result = client.send_message(leader, message).await;
    spinner.finish_and_clear();
    session::persist(client.fetch_client())?;

    let reply = result?;
    let time = format_server_timestamp(&reply.timestamp, config.display.clock).unwrap_or_else(|e| {
        warn!("Unexpected reply timestamp: {}", e);
        reply.timestamp.clone()
    });

    println!("{} {}", leader.bold(), time.dimmed());
    println!("{}", reply.response);
    Ok(())
}
