//! The session handshake against the remote service.
//!
//! Two paths into a session:
//!
//! 1. Password handshake: fetch the server's public key, encrypt the
//!    password locally, POST username + ciphertext to the session endpoint.
//! 2. Token exchange: when an identity-provider access token is supplied,
//!    POST it to the token-exchange endpoint via a side client. The password
//!    is never read on this path.
//!
//! Both return the opaque session token the server issues.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use sessmux_core::{
    ClientError, Credentials, ServiceTransport, TransportError, AUTHENTICATION_HEADER_NAME,
};

use super::keys;

/// Endpoint serving the RSA key-value XML.
pub(crate) const PUBLIC_KEY_PATH: &str = "session/publickey";

/// Session creation (POST) and deletion (DELETE) endpoint.
pub(crate) const SESSION_PATH: &str = "session";

/// Base path of the token-exchange service on the same host.
pub(crate) const TOKEN_EXCHANGE_BASE_PATH: &str = "identity";

/// Token-exchange endpoint, relative to [`TOKEN_EXCHANGE_BASE_PATH`].
pub(crate) const TOKEN_EXCHANGE_PATH: &str = "session/token";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PublicKeyResponse {
    xml: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateSessionRequest<'a> {
    username: &'a str,
    encrypted_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TokenExchangeRequest<'a> {
    token: &'a str,
}

/// Establish a session and return its token.
pub async fn login(
    transport: &Arc<dyn ServiceTransport>,
    credentials: &Credentials,
) -> Result<String, ClientError> {
    // Idempotent on fresh clients; a reused client must not leak a stale
    // token or cookie into the handshake.
    clear_authentication(transport.as_ref());

    if credentials.has_access_token() {
        return login_with_access_token(transport, credentials.access_token()).await;
    }

    debug!("[LoginFlow] Requesting server public key");
    let raw = transport.get(PUBLIC_KEY_PATH).await.map_err(map_login_error)?;
    let public_key: PublicKeyResponse = serde_json::from_value(raw)
        .map_err(|e| TransportError::Decode(format!("public key response: {}", e)))?;

    let encrypted_password = keys::encrypt_password(&public_key.xml, credentials.password())?;

    let body = to_body(&CreateSessionRequest {
        username: credentials.username(),
        encrypted_password,
    })?;
    let raw = transport
        .post(SESSION_PATH, body)
        .await
        .map_err(map_login_error)?;

    let token = session_token_from(raw)?;
    info!("[LoginFlow] Session established for '{}'", credentials.username());
    Ok(token)
}

/// Token exchange: trade an identity-provider access token for a session.
async fn login_with_access_token(
    transport: &Arc<dyn ServiceTransport>,
    access_token: &str,
) -> Result<String, ClientError> {
    debug!("[LoginFlow] Exchanging identity-provider token for a session");

    let exchange = transport.clone_with_base_path(TOKEN_EXCHANGE_BASE_PATH);
    let body = to_body(&TokenExchangeRequest { token: access_token })?;
    let raw = exchange
        .post(TOKEN_EXCHANGE_PATH, body)
        .await
        .map_err(map_login_error)?;

    let token = session_token_from(raw)?;
    info!("[LoginFlow] Session established via token exchange");
    Ok(token)
}

/// Tear the session down server-side.
///
/// Failures map to [`ClientError::Logout`] so callers discarding the local
/// connection anyway can log and move on.
pub async fn logout(transport: &Arc<dyn ServiceTransport>) -> Result<(), ClientError> {
    transport
        .delete(SESSION_PATH)
        .await
        .map_err(|e| ClientError::Logout(e.to_string()))?;
    Ok(())
}

/// Apply a freshly issued session token to the transport.
pub fn set_authentication_token(transport: &dyn ServiceTransport, token: &str) {
    transport.remove_header(AUTHENTICATION_HEADER_NAME);
    transport.set_header(AUTHENTICATION_HEADER_NAME, token);
    transport.expire_auth_cookie();
}

/// Drop any authentication state the transport may still carry.
pub fn clear_authentication(transport: &dyn ServiceTransport) {
    transport.remove_header(AUTHENTICATION_HEADER_NAME);
    transport.expire_auth_cookie();
}

/// The server answers session creation with the token as a JSON string.
fn session_token_from(raw: Value) -> Result<String, ClientError> {
    serde_json::from_value(raw)
        .map_err(|e| TransportError::Decode(format!("session token: {}", e)).into())
}

fn to_body<T: Serialize>(request: &T) -> Result<Value, ClientError> {
    serde_json::to_value(request)
        .map_err(|e| TransportError::Decode(format!("request body: {}", e)).into())
}

/// Unauthorized statuses during login mean the credentials were rejected.
fn map_login_error(err: TransportError) -> ClientError {
    if err.is_unauthorized() {
        ClientError::Authentication(err.to_string())
    } else {
        ClientError::Transport(err)
    }
}
