//! Configuration management command
//!
//! Provides CLI interface to view and edit the Parley configuration.

use crate::system_config::{self, SystemConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Keys accepted by `config get` / `config set`
const KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout_secs",
    "display.clock",
    "preview.debounce_ms",
    "logging.level",
    "logging.file",
];

/// List all configuration values
pub async fn run_list(config: &SystemConfig) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "Parley Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[api]".yellow());
    println!("  {} = {}", "base_url".cyan(), config.api.base_url);
    println!(
        "  {} = {} {}",
        "timeout_secs".cyan(),
        config.api.timeout_secs,
        format!("({}s)", config.api.timeout_secs).dimmed()
    );

    println!("\n{}", "[display]".yellow());
    println!("  {} = {}", "clock".cyan(), config.display.clock);

    println!("\n{}", "[preview]".yellow());
    println!(
        "  {} = {} {}",
        "debounce_ms".cyan(),
        config.preview.debounce_ms,
        format!("({}ms quiet period)", config.preview.debounce_ms).dimmed()
    );

    println!("\n{}", "[logging]".yellow());
    println!("  {} = {}", "level".cyan(), config.logging.level);
    println!(
        "  {} = {}",
        "file".cyan(),
        match &config.logging.file {
            Some(path) => path.display().to_string(),
            None => "(stderr)".dimmed().to_string(),
        }
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!("  timeout_secs: 1-600");
    println!("  debounce_ms: 0-60,000");
    println!("  clock: twelve_hour, twenty_four_hour (or 12, 24)");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(config: &SystemConfig, key: &str) -> Result<()> {
    println!("{}", get_value(config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(mut config: SystemConfig, key: &str, value: &str) -> Result<()> {
    set_value(&mut config, key, value)?;

    // Validate before saving
    config.validate()
        .context("Invalid configuration value")?;

    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    print!("{}", system_config::example_config());
    Ok(())
}

fn get_value(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "api.base_url" => config.api.base_url.clone(),
        "api.timeout_secs" => config.api.timeout_secs.to_string(),
        "display.clock" => config.display.clock.to_string(),
        "preview.debounce_ms" => config.preview.debounce_ms.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.file" => config
            .logging
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        _ => unknown_key(key)?,
    };
    Ok(value)
}

fn set_value(config: &mut SystemConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "api.base_url" => config.api.base_url = value.to_string(),
        "api.timeout_secs" => {
            config.api.timeout_secs = value.parse()
                .context("Invalid value: must be a positive integer")?;
        }
        "display.clock" => {
            config.display.clock = value.parse()
                .context("Invalid value: must be '12' or '24'")?;
        }
        "preview.debounce_ms" => {
            config.preview.debounce_ms = value.parse()
                .context("Invalid value: must be a non-negative integer")?;
        }
        "logging.level" => config.logging.level = value.to_string(),
        "logging.file" => {
            // Empty value switches back to stderr
            config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        _ => unknown_key(key)?,
    }
    Ok(())
}

fn unknown_key<T>(key: &str) -> Result<T> {
    anyhow::bail!(
        "Unknown config key: {}. Known keys: {}",
        key,
        KEYS.join(", ")
    )
}
