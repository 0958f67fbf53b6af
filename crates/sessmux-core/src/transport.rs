//! ServiceTransport boundary trait.
//!
//! The pool and login flows are written purely against this trait; the wire
//! schemas, TLS, and retry policy of the remote API all live behind it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportResult;

/// Header carrying the session token on authenticated calls.
pub const AUTHENTICATION_HEADER_NAME: &str = "X-Authentication-Token";

/// Cookie the server may set alongside the session token. Expired locally
/// whenever a new token is applied so a stale cookie can never win.
pub const AUTHENTICATION_COOKIE_NAME: &str = "sessmux-session";

/// Generic authenticated call primitives plus the header/cookie mutation
/// hooks the login flow needs.
///
/// Implementations must be cheaply shareable behind `Arc` and safe to call
/// concurrently; header and cookie mutation take `&self`.
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    /// Issue a GET against `path` (relative to the client's base URL).
    async fn get(&self, path: &str) -> TransportResult<Value>;

    /// Issue a POST with a JSON body.
    async fn post(&self, path: &str, body: Value) -> TransportResult<Value>;

    /// Issue a DELETE.
    async fn delete(&self, path: &str) -> TransportResult<Value>;

    /// Set a header applied to every subsequent request.
    fn set_header(&self, name: &str, value: &str);

    /// Remove a previously set header. No-op when absent.
    fn remove_header(&self, name: &str);

    /// Invalidate any authentication cookie held by this client.
    fn expire_auth_cookie(&self);

    /// Clone this client pointed at a different base path, sharing headers
    /// and timeouts. Used to reach the token-exchange endpoint.
    fn clone_with_base_path(&self, base_path: &str) -> Arc<dyn ServiceTransport>;
}

/// Builds a transport for a hostname. Injected into the pool so cache misses
/// can construct a client without the pool knowing transport details.
pub trait TransportFactory: Send + Sync {
    fn create(&self, hostname: &str) -> TransportResult<Arc<dyn ServiceTransport>>;
}
