//! Error taxonomy for session establishment and pooled connections.
//!
//! `TransportError` covers the wire; `ClientError` covers the login/logout
//! lifecycle built on top of it. Login failures always surface to the caller;
//! logout failures are observable but never fatal (the local connection is
//! being discarded regardless).

use thiserror::Error;

/// Result alias for transport-level operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by the wire-level transport.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network failure: connect, timeout, TLS, or mid-request I/O.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success HTTP status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// True when the server explicitly refused the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Status { status, .. } if *status == 401 || *status == 403)
    }
}

/// Errors raised by the session lifecycle (login, logout, pooling).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials or token rejected by the remote system.
    #[error("authentication rejected: {0}")]
    Authentication(String),

    /// Malformed public-key exchange material.
    #[error("malformed public key material: {0}")]
    KeyFormat(String),

    /// Network or protocol failure surfaced from the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server could not be notified of session termination.
    /// Non-fatal: the local connection is evicted either way.
    #[error("session logout failed: {0}")]
    Logout(String),
}
