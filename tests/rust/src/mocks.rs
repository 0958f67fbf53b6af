//! Mock implementations for testing
//!
//! In-memory implementations of the boundary traits for fast, isolated
//! pool tests: no network, no crypto.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use sessmux_core::{
    Authenticator, ClientError, Credentials, ServiceTransport, TransportFactory, TransportResult,
};

// ============================================================================
// MockAuthenticator
// ============================================================================

/// Shared login/logout call counters, cloneable into several
/// `MockAuthenticator`s so tests can observe calls across pool entries.
#[derive(Clone, Default)]
pub struct AuthCallLog {
    logins: Arc<AtomicUsize>,
    logouts: Arc<AtomicUsize>,
}

impl AuthCallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

/// Counts calls and issues a distinct token per login (`session-1`,
/// `session-2`, ...), so tests can tell a fresh login from a reused session.
pub struct MockAuthenticator {
    log: AuthCallLog,
    fail_login: bool,
}

impl MockAuthenticator {
    pub fn new(log: AuthCallLog) -> Self {
        Self {
            log,
            fail_login: false,
        }
    }

    /// A variant whose login is always rejected.
    pub fn failing(log: AuthCallLog) -> Self {
        Self {
            log,
            fail_login: true,
        }
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(
        &self,
        _transport: &Arc<dyn ServiceTransport>,
        _credentials: &Credentials,
    ) -> Result<String, ClientError> {
        let attempt = self.log.logins.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_login {
            return Err(ClientError::Authentication("mock rejection".to_string()));
        }
        Ok(format!("session-{}", attempt))
    }

    async fn logout(&self, _transport: &Arc<dyn ServiceTransport>) -> Result<(), ClientError> {
        self.log.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// NullTransport
// ============================================================================

/// Transport that answers every call with `null` and ignores header and
/// cookie mutation. Pool tests never reach the wire.
#[derive(Default)]
pub struct NullTransport;

#[async_trait]
impl ServiceTransport for NullTransport {
    async fn get(&self, _path: &str) -> TransportResult<Value> {
        Ok(Value::Null)
    }

    async fn post(&self, _path: &str, _body: Value) -> TransportResult<Value> {
        Ok(Value::Null)
    }

    async fn delete(&self, _path: &str) -> TransportResult<Value> {
        Ok(Value::Null)
    }

    fn set_header(&self, _name: &str, _value: &str) {}

    fn remove_header(&self, _name: &str) {}

    fn expire_auth_cookie(&self) {}

    fn clone_with_base_path(&self, _base_path: &str) -> Arc<dyn ServiceTransport> {
        Arc::new(NullTransport)
    }
}

#[derive(Default)]
pub struct NullTransportFactory;

impl TransportFactory for NullTransportFactory {
    fn create(&self, _hostname: &str) -> TransportResult<Arc<dyn ServiceTransport>> {
        Ok(Arc::new(NullTransport))
    }
}
