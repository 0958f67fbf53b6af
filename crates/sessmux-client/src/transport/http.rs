//! Reqwest-backed ServiceTransport.
//!
//! Headers and the authentication cookie are managed locally rather than via
//! reqwest's cookie store: the login flow needs to expire the auth cookie on
//! demand, which a shared jar does not allow.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use sessmux_core::{
    ServiceTransport, TransportError, TransportFactory, TransportResult,
    AUTHENTICATION_COOKIE_NAME,
};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client bound to one base URL.
///
/// Request paths are joined against the base URL, which always carries a
/// trailing slash so relative joins never drop path segments.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    headers: RwLock<HashMap<String, String>>,
    auth_cookie: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Create a transport for `base_url` with the given request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url),
            headers: RwLock::new(HashMap::new()),
            auth_cookie: RwLock::new(None),
        })
    }

    fn with_parts(client: reqwest::Client, base_url: Url, headers: HashMap<String, String>) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
            headers: RwLock::new(headers),
            auth_cookie: RwLock::new(None),
        }
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> TransportResult<Value> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::Request(format!("invalid path '{}': {}", path, e)))?;

        let mut request = self.client.request(method, url);

        for (name, value) in self.headers.read().iter() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = self.auth_cookie.read().as_ref() {
            request = request.header(
                header::COOKIE,
                format!("{}={}", AUTHENTICATION_COOKIE_NAME, cookie),
            );
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        self.capture_auth_cookie(response.headers());

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Remember the server's authentication cookie so it can be expired
    /// when a new session token is applied.
    fn capture_auth_cookie(&self, headers: &header::HeaderMap) {
        for raw in headers.get_all(header::SET_COOKIE) {
            let Ok(cookie) = raw.to_str() else { continue };
            let Some((name, rest)) = cookie.split_once('=') else {
                continue;
            };
            if name.trim() == AUTHENTICATION_COOKIE_NAME {
                let value = rest.split(';').next().unwrap_or(rest).trim().to_string();
                *self.auth_cookie.write() = Some(value);
            }
        }
    }
}

#[async_trait]
impl ServiceTransport for HttpTransport {
    async fn get(&self, path: &str) -> TransportResult<Value> {
        self.execute(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> TransportResult<Value> {
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> TransportResult<Value> {
        self.execute(Method::DELETE, path, None).await
    }

    fn set_header(&self, name: &str, value: &str) {
        self.headers.write().insert(name.to_string(), value.to_string());
    }

    fn remove_header(&self, name: &str) {
        self.headers.write().remove(name);
    }

    fn expire_auth_cookie(&self) {
        *self.auth_cookie.write() = None;
    }

    fn clone_with_base_path(&self, base_path: &str) -> Arc<dyn ServiceTransport> {
        let mut url = self.base_url.clone();
        url.set_path(base_path);

        debug!("[HttpTransport] Cloning client for base path '{}'", base_path);

        // Shares the reqwest client (connection pool + timeout) and copies
        // the current header snapshot. The clone starts without a cookie.
        Arc::new(Self::with_parts(
            self.client.clone(),
            url,
            self.headers.read().clone(),
        ))
    }
}

/// Ensure the base URL path ends with '/' so `Url::join` keeps it.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Builds an [`HttpTransport`] per hostname.
///
/// The hostname may be bare (`example.com`, scheme defaults to https) or a
/// full URL. Base path and timeout are injected by the composition root.
pub struct HttpTransportFactory {
    timeout: Duration,
    base_path: Option<String>,
}

impl Default for HttpTransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransportFactory {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            base_path: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }
}

impl TransportFactory for HttpTransportFactory {
    fn create(&self, hostname: &str) -> TransportResult<Arc<dyn ServiceTransport>> {
        let with_scheme = if hostname.contains("://") {
            hostname.to_string()
        } else {
            format!("https://{}", hostname)
        };

        let mut url = Url::parse(&with_scheme)
            .map_err(|e| TransportError::Request(format!("invalid hostname '{}': {}", hostname, e)))?;
        if let Some(base_path) = &self.base_path {
            url.set_path(base_path);
        }

        Ok(Arc::new(HttpTransport::new(url, self.timeout)?))
    }
}
