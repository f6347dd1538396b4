//! Send a JSON request

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;
use web::{Method, RequestOptions};

use crate::session;
use crate::system_config::SystemConfig;
use crate::util;

pub async fn run(
    config: &SystemConfig,
    endpoint: &str,
    method: &str,
    data: Option<&str>,
    headers: &[String],
) -> Result<()> {
    let options = build_options(method, data, headers)?;
    let client = util::fetch_client(config)?;

    debug!(endpoint, method = %options.method, "fetch command");
    let spinner = util::spinner(format!("{} {}", options.method, endpoint));
    let result = client.fetch_api::<Value>(endpoint, options).await;
    spinner.finish_and_clear();
    session::persist(&client)?;

    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn build_options(method: &str, data: Option<&str>, headers: &[String]) -> Result<RequestOptions> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {}", method))?;

    let mut options = RequestOptions::default().method(method);

    if let Some(data) = data {
        let body: Value = serde_json::from_str(data).context("Invalid JSON body")?;
        options = options.body(body);
    }

    for raw in headers {
        let (name, value) = util::parse_header(raw)?;
        options = options.header(name, value);
    }

    Ok(options)
}
