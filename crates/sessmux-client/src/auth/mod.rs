//! Authentication strategies and the encrypted-password login flow.
//!
//! - `login` - the handshake itself (public key fetch, password encryption,
//!   session creation, token exchange, logout)
//! - `keys` - RSA key-value XML decoding and password encryption
//! - `PasswordAuthenticator` / `ExistingSessionAuthenticator` - the
//!   [`Authenticator`](sessmux_core::Authenticator) variants

mod existing;
mod keys;
pub mod login;
mod password;

pub use existing::ExistingSessionAuthenticator;
pub use password::PasswordAuthenticator;
