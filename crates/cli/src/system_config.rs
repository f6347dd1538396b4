//! User configuration (`config.toml`)
//!
//! Looked up at `$PARLEY_CONFIG`, falling back to
//! `<config dir>/parley/config.toml`. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use web::ClockStyle;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PARLEY_CONFIG";

/// Upper bound for the preview quiet period
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
}

/// Chat back end connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL relative endpoints resolve against
    pub base_url: String,
    /// Per-request timeout (1-600)
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub clock: ClockStyle,
}

/// Live preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Quiet period before re-rendering (0-60000)
    pub debounce_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `web=debug`
    pub level: String,
    /// Write logs here instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl SystemConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url is not a valid URL: {}", self.api.base_url))?;

        if !(1..=600).contains(&self.api.timeout_secs) {
            anyhow::bail!(
                "api.timeout_secs must be between 1 and 600, got {}",
                self.api.timeout_secs
            );
        }

        if self.preview.debounce_ms > MAX_DEBOUNCE_MS {
            anyhow::bail!(
                "preview.debounce_ms must be between 0 and {}, got {}",
                MAX_DEBOUNCE_MS,
                self.preview.debounce_ms
            );
        }

        EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("logging.level is not a valid filter: {}", self.logging.level))?;

        Ok(())
    }
}

/// Resolve the config file location
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("parley").join("config.toml"))
}

/// Load configuration, falling back to defaults when no file exists
pub fn load() -> Result<SystemConfig> {
    match config_file_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(SystemConfig::default()),
    }
}

/// Load and validate a specific file
pub fn load_from(path: &Path) -> Result<SystemConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Write configuration to the resolved config path
pub fn save(config: &SystemConfig) -> Result<()> {
    let path = config_file_path().context("Could not determine config file path")?;
    save_to(config, &path)
}

pub fn save_to(config: &SystemConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Create the config file with defaults if it does not exist yet
pub fn init_if_missing() -> Result<PathBuf> {
    let path = config_file_path().context("Could not determine config file path")?;
    if !path.exists() {
        save_to(&SystemConfig::default(), &path)?;
    }
    Ok(path)
}

/// Commented example configuration
pub fn example_config() -> &'static str {
    r#"# Parley configuration

[api]
# Chat server that relative endpoints resolve against
base_url = "http://127.0.0.1:5000"
# Request timeout in seconds (1-600)
timeout_secs = 30

[display]
# "twelve_hour" (2:05:09 PM) or "twenty_four_hour" (14:05:09)
clock = "twelve_hour"

[preview]
# Quiet period before the live preview re-renders (0-60000 ms)
debounce_ms = 300

[logging]
# tracing filter directive; PARLEY_LOG overrides it
level = "warn"
# file = "/tmp/parley.log"
"#
}
