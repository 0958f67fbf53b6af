//! Pre-established session reuse.

use std::sync::Arc;

use async_trait::async_trait;

use sessmux_core::{Authenticator, ClientError, Credentials, ServiceTransport};

/// Wraps a session token obtained elsewhere.
///
/// `login` returns the token unconditionally and ignores the supplied
/// credentials; `logout` is a no-op since the pool never owns or terminates
/// externally-supplied sessions. Stateless, so instances can be shared.
#[derive(Debug, Clone)]
pub struct ExistingSessionAuthenticator {
    session_token: String,
}

impl ExistingSessionAuthenticator {
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
        }
    }
}

#[async_trait]
impl Authenticator for ExistingSessionAuthenticator {
    async fn login(
        &self,
        _transport: &Arc<dyn ServiceTransport>,
        _credentials: &Credentials,
    ) -> Result<String, ClientError> {
        Ok(self.session_token.clone())
    }

    async fn logout(&self, _transport: &Arc<dyn ServiceTransport>) -> Result<(), ClientError> {
        Ok(())
    }
}
