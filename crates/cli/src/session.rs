//! Session cookies kept between runs
//!
//! The chat back end stores history in a cookie-backed session. Cookies it
//! sets are written to `cookies.json` next to the config file, keyed by
//! base URL, and loaded into the jar of the next run.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;
use web::{CookieStore, FetchClient, Jar};

use crate::system_config;

/// File name of the cookie store, inside the config directory
pub const SESSION_FILE: &str = "cookies.json";

/// Base URL → `Cookie` header value
type Store = BTreeMap<String, String>;

/// Resolve the cookie store location
pub fn session_file_path() -> Option<PathBuf> {
    let config_path = system_config::config_file_path()?;
    Some(config_path.parent()?.join(SESSION_FILE))
}

/// Jar pre-loaded with the cookies stored for `base_url`
pub fn restore(base_url: &Url) -> Result<Arc<Jar>> {
    match session_file_path() {
        Some(path) => restore_from(&path, base_url),
        None => Ok(Arc::new(Jar::default())),
    }
}

pub fn restore_from(path: &Path, base_url: &Url) -> Result<Arc<Jar>> {
    let jar = Arc::new(Jar::default());
    if !path.exists() {
        return Ok(jar);
    }

    // A damaged store only costs the session, never the command
    let store = match read_store(path) {
        Ok(store) => store,
        Err(e) => {
            warn!("Ignoring cookie store {}: {:#}", path.display(), e);
            return Ok(jar);
        }
    };

    if let Some(header) = store.get(base_url.as_str()) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            jar.add_cookie_str(&format!("{}; Path=/", pair), base_url);
        }
        debug!(base_url = %base_url, "restored session cookies");
    }
    Ok(jar)
}

/// Save the client's current cookies for its base URL
pub fn persist(client: &FetchClient) -> Result<()> {
    let (Some(path), Some(base_url)) = (session_file_path(), client.base_url()) else {
        return Ok(());
    };
    persist_to(&path, client.cookie_jar(), base_url)
}

pub fn persist_to(path: &Path, jar: &Jar, base_url: &Url) -> Result<()> {
    let mut store = if path.exists() {
        read_store(path).unwrap_or_default()
    } else {
        Store::new()
    };

    match jar.cookies(base_url) {
        Some(header) => {
            let header = header.to_str().context("Cookie header is not valid text")?;
            store.insert(base_url.to_string(), header.to_string());
        }
        None => {
            store.remove(base_url.as_str());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(&store).context("Failed to serialize cookies")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write cookie store {}", path.display()))?;
    Ok(())
}

fn read_store(path: &Path) -> Result<Store> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
