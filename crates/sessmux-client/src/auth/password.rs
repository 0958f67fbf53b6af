//! Password-based authentication strategy.

use std::sync::Arc;

use async_trait::async_trait;

use sessmux_core::{Authenticator, ClientError, Credentials, ServiceTransport};

use super::login;

/// Authenticates via the encrypted-password handshake (or token exchange
/// when the credentials carry an identity-provider access token).
#[derive(Debug, Default)]
pub struct PasswordAuthenticator;

impl PasswordAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn login(
        &self,
        transport: &Arc<dyn ServiceTransport>,
        credentials: &Credentials,
    ) -> Result<String, ClientError> {
        login::login(transport, credentials).await
    }

    async fn logout(&self, transport: &Arc<dyn ServiceTransport>) -> Result<(), ClientError> {
        login::logout(transport).await
    }
}
