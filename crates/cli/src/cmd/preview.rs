//! Debounced live markdown preview
//!
//! Every stdin line re-triggers the debouncer with the text typed so far.
//! The rendered HTML is printed once input pauses for the quiet period.

use anyhow::{Context, Result};
use debounce::{wait_from_millis, Debouncer};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use web::parse_markdown;

use crate::system_config::{SystemConfig, MAX_DEBOUNCE_MS};

pub async fn run(config: &SystemConfig, wait_ms: Option<i64>) -> Result<()> {
    let wait = resolve_wait(config, wait_ms)?;

    let (html_tx, mut html_rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(html) = html_rx.recv().await {
            println!("{}", html);
        }
    });

    let debouncer = Debouncer::new(
        move |text: String| {
            // Receiver only goes away once the printer has stopped
            let _ = html_tx.send(parse_markdown(&text));
        },
        wait,
    )?;
    info!("Starting preview (wait: {:?})", debouncer.wait());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = String::new();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&line);
        debouncer.invoke(buffer.clone());
    }

    // Let the last burst settle before tearing down
    let poll = debouncer.wait().clamp(Duration::from_millis(5), Duration::from_millis(50));
    while debouncer.is_pending() {
        tokio::time::sleep(poll).await;
    }
    debug!("Input closed, flushing preview");

    // Dropping the debouncer drops the sender once any running render is done
    drop(debouncer);
    printer.await.context("Preview printer failed")?;
    Ok(())
}

/// Quiet period from `--wait-ms`, else from `preview.debounce_ms`
fn resolve_wait(config: &SystemConfig, wait_ms: Option<i64>) -> Result<Duration> {
    let Some(ms) = wait_ms else {
        return Ok(Duration::from_millis(config.preview.debounce_ms));
    };

    let wait = wait_from_millis(ms)?;
    if wait > Duration::from_millis(MAX_DEBOUNCE_MS) {
        anyhow::bail!("--wait-ms must be between 0 and {}, got {}", MAX_DEBOUNCE_MS, ms);
    }
    Ok(wait)
}
