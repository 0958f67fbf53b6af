//! Credential material and the pool lookup key.
//!
//! Both types carry secrets: `Debug` output redacts them and the backing
//! memory is zeroized on drop. Neither type is ever serialized.

use std::fmt;

use zeroize::Zeroize;

/// Credentials supplied by a caller requesting a session.
///
/// An empty `access_token` selects the password handshake; a non-empty one
/// short-circuits to the token-exchange endpoint and the password is never
/// read.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    username: String,
    password: String,
    access_token: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            access_token: access_token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// True when an identity-provider access token was supplied.
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.password.zeroize();
        self.access_token.zeroize();
    }
}

/// Identity of a logical session: one entry per distinct key lives in the
/// pool at any time. Equality is structural over all four fields.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    hostname: String,
    username: String,
    password: String,
    access_token: String,
}

impl ConnectionKey {
    pub fn new(hostname: impl Into<String>, credentials: &Credentials) -> Self {
        Self {
            hostname: hostname.into(),
            username: credentials.username().to_string(),
            password: credentials.password().to_string(),
            access_token: credentials.access_token().to_string(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionKey")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl Drop for ConnectionKey {
    fn drop(&mut self) {
        self.password.zeroize();
        self.access_token.zeroize();
    }
}
