//! # Sessmux Client
//!
//! Reference-counted session pooling for a stateful remote service, with
//! pluggable authentication strategies:
//!
//! - **ConnectionPool**: registry mapping (host, credentials) to one shared
//!   authenticated session; logs out when the last holder releases it
//! - **Connection**: caller-facing handle to a pooled session
//! - **PasswordAuthenticator**: encrypted-password handshake, with a
//!   token-exchange short-circuit for identity-provider access tokens
//! - **ExistingSessionAuthenticator**: wraps a pre-obtained session token
//! - **HttpTransport**: reqwest-backed [`ServiceTransport`] implementation
//!
//! [`ServiceTransport`]: sessmux_core::ServiceTransport

pub mod auth;
pub mod pool;
pub mod transport;

pub use auth::{ExistingSessionAuthenticator, PasswordAuthenticator};
pub use pool::{Connection, ConnectionPool};
pub use transport::{HttpTransport, HttpTransportFactory};
