//! JSON-over-HTTP fetch wrapper
//!
//! Every request carries `Content-Type: application/json` unless the
//! caller overrides it. Non-2xx responses become errors, and every error
//! displays as `API request failed: <reason>`.

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Fetch failures
///
/// Each variant renders with the `API request failed:` prefix so callers
/// can show the message directly.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("API request failed: HTTP error! status: {status}")]
    Status { status: u16 },

    /// Connection, timeout or protocol failure
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("API request failed: invalid JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request body could not be encoded
    #[error("API request failed: invalid JSON body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("API request failed: invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("API request failed: invalid header '{name}'")]
    InvalidHeader { name: String },
}

impl FetchError {
    /// HTTP status, when the server answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers, applied after the default content type
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self::default().method(Method::POST).body(body)
    }

    pub fn delete() -> Self {
        Self::default().method(Method::DELETE)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client issuing JSON requests
///
/// Cookies set by the server are kept in a jar and sent back on later
/// requests, so a server-side session survives between calls. Clones
/// share the jar.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    base_url: Option<Url>,
    cookies: Arc<Jar>,
}

impl FetchClient {
    /// Client without a base URL; endpoints must be absolute
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Self::build(None, timeout, Arc::new(Jar::default()))
    }

    /// Client resolving relative endpoints against `base_url`
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_cookie_jar(base_url, timeout, Arc::new(Jar::default()))
    }

    /// Like `with_base_url`, using an existing cookie jar
    pub fn with_cookie_jar(
        base_url: &str,
        timeout: Duration,
        cookies: Arc<Jar>,
    ) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::InvalidEndpoint {
            endpoint: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Self::build(Some(base), timeout, cookies)
    }

    fn build(base_url: Option<Url>, timeout: Duration, cookies: Arc<Jar>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(Arc::clone(&cookies))
            .build()?;
        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Cookie jar shared by every request from this client
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.cookies
    }

    /// Resolve an endpoint to a full URL
    pub fn resolve(&self, endpoint: &str) -> Result<Url, FetchError> {
        let invalid = |reason: String| FetchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(endpoint).map_err(|e| invalid(e.to_string())),
                None => Err(invalid("relative endpoint and no base URL".to_string())),
            },
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Send a request and decode the JSON response into `T`
    pub async fn fetch_api<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        let url = self.resolve(endpoint)?;
        self.fetch_url(url, options).await
    }

    /// Like `fetch_api`, for an already resolved URL
    pub async fn fetch_url<T: DeserializeOwned>(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        let headers = build_headers(&options.headers)?;

        info!(method = %options.method, %url, "API request");
        let mut request = self.client.request(options.method, url).headers(headers);
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(FetchError::Encode)?;
            request = request.body(bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "API response");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(FetchError::Decode)
    }
}

/// Default JSON content type, then caller headers (which win on conflict)
fn build_headers(extra: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let invalid = || FetchError::InvalidHeader { name: name.clone() };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(name, value);
    }

    Ok(headers)
}
