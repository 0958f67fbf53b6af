//! Authenticator strategy trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Credentials;
use crate::error::ClientError;
use crate::transport::ServiceTransport;

/// Turns credentials into a server-side session and can later terminate it.
///
/// The transport is passed in rather than owned so stateless variants (for
/// example pre-established session reuse) can be shared freely.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Establish a session and return its opaque token.
    ///
    /// Fails with [`ClientError::Authentication`] when the remote handshake
    /// is rejected; transport failures surface as [`ClientError::Transport`].
    async fn login(
        &self,
        transport: &Arc<dyn ServiceTransport>,
        credentials: &Credentials,
    ) -> Result<String, ClientError>;

    /// Terminate the session. Best-effort: safe to call at most once per
    /// successful login, and an already-invalid session is not an error the
    /// caller can act on.
    async fn logout(&self, transport: &Arc<dyn ServiceTransport>) -> Result<(), ClientError>;
}
