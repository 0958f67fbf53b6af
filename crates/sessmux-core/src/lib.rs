//! # Sessmux Core Library
//!
//! Domain types, error taxonomy, and boundary traits for sessmux.
//!
//! ## Modules
//!
//! - `domain` - Value types (Credentials, ConnectionKey)
//! - `error` - Error taxonomy (TransportError, ClientError)
//! - `transport` - ServiceTransport boundary trait and factory
//! - `auth` - Authenticator strategy trait

pub mod auth;
pub mod domain;
pub mod error;
pub mod transport;

// Re-export commonly used types
pub use auth::Authenticator;
pub use domain::*;
pub use error::{ClientError, TransportError, TransportResult};
pub use transport::{
    ServiceTransport, TransportFactory, AUTHENTICATION_COOKIE_NAME, AUTHENTICATION_HEADER_NAME,
};
