//! Login flow integration tests with a mock HTTP server.
//!
//! These drive the real HttpTransport + PasswordAuthenticator through the
//! pool: encrypted password handshake, token-exchange short-circuit, error
//! mapping, and logout on last release.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pretty_assertions::assert_eq;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey};
use serde_json::Value;
use sha1::Sha1;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sessmux_client::{ConnectionPool, HttpTransportFactory, PasswordAuthenticator};
use sessmux_core::ClientError;

fn pool() -> Arc<ConnectionPool> {
    Arc::new(ConnectionPool::new(Arc::new(HttpTransportFactory::new())))
}

/// Server-side RSA keypair plus its public half in exchange XML.
fn server_keypair() -> (RsaPrivateKey, String) {
    let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("keygen");
    let xml = format!(
        "<RSAKeyValue><Modulus>{}</Modulus><Exponent>{}</Exponent></RSAKeyValue>",
        STANDARD.encode(key.n().to_bytes_be()),
        STANDARD.encode(key.e().to_bytes_be()),
    );
    (key, xml)
}

async fn mount_public_key(server: &MockServer, xml: &str) {
    Mock::given(method("GET"))
        .and(path("/session/publickey"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Xml": xml })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn password_handshake_encrypts_with_the_served_public_key() {
    let mock_server = MockServer::start().await;
    let (server_key, xml) = server_keypair();

    mount_public_key(&mock_server, &xml).await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json("tok-1"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pool = pool();
    let conn = pool
        .get_connection(
            &mock_server.uri(),
            "user",
            "secret-password",
            "",
            Box::new(PasswordAuthenticator::new()),
        )
        .await
        .unwrap();

    assert_eq!(conn.session_token(), "tok-1");
    assert_eq!(conn.connection_count(), 1);

    // The password crossed the wire encrypted, and only encrypted.
    let requests = mock_server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == "/session")
        .expect("session creation request");
    let body: Value = serde_json::from_slice(&create.body).unwrap();

    assert_eq!(body["Username"], "user");
    let ciphertext = STANDARD
        .decode(body["EncryptedPassword"].as_str().unwrap())
        .unwrap();
    let plaintext = server_key.decrypt(Oaep::new::<Sha1>(), &ciphertext).unwrap();
    assert_eq!(plaintext, b"secret-password");
    assert!(!String::from_utf8_lossy(&create.body).contains("secret-password"));
}

#[tokio::test]
async fn access_token_short_circuits_to_the_token_exchange_endpoint() {
    let mock_server = MockServer::start().await;

    // The password path must never be touched.
    Mock::given(method("GET"))
        .and(path("/session/publickey"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/identity/session/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json("tok-idp"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pool = pool();
    let conn = pool
        .get_connection(
            &mock_server.uri(),
            "user",
            "password-never-read",
            "idp-access-token",
            Box::new(PasswordAuthenticator::new()),
        )
        .await
        .unwrap();

    assert_eq!(conn.session_token(), "tok-idp");

    let requests = mock_server.received_requests().await.unwrap();
    let exchange = requests
        .iter()
        .find(|r| r.url.path() == "/identity/session/token")
        .expect("token exchange request");
    let body: Value = serde_json::from_slice(&exchange.body).unwrap();
    assert_eq!(body["Token"], "idp-access-token");
}

#[tokio::test]
async fn malformed_public_key_fails_and_leaves_no_entry() {
    let mock_server = MockServer::start().await;
    mount_public_key(&mock_server, "<NotAKey/>").await;

    let pool = pool();
    let result = pool
        .get_connection(
            &mock_server.uri(),
            "user",
            "pw",
            "",
            Box::new(PasswordAuthenticator::new()),
        )
        .await;

    assert!(matches!(result, Err(ClientError::KeyFormat(_))));
    assert_eq!(pool.active_sessions().await, 0);
}

#[tokio::test]
async fn rejected_credentials_surface_an_authentication_error() {
    let mock_server = MockServer::start().await;
    let (_, xml) = server_keypair();

    mount_public_key(&mock_server, &xml).await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&mock_server)
        .await;

    let pool = pool();
    let result = pool
        .get_connection(
            &mock_server.uri(),
            "user",
            "wrong-pw",
            "",
            Box::new(PasswordAuthenticator::new()),
        )
        .await;

    assert!(matches!(result, Err(ClientError::Authentication(_))));
    assert_eq!(pool.active_sessions().await, 0);
}

#[tokio::test]
async fn last_close_deletes_the_session_with_the_token_header() {
    let mock_server = MockServer::start().await;
    let (_, xml) = server_keypair();

    mount_public_key(&mock_server, &xml).await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json("tok-1"))
        .mount(&mock_server)
        .await;
    // The logout call carries the session token applied after login.
    Mock::given(method("DELETE"))
        .and(path("/session"))
        .and(header("X-Authentication-Token", "tok-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pool = pool();
    let conn = pool
        .get_connection(
            &mock_server.uri(),
            "user",
            "pw",
            "",
            Box::new(PasswordAuthenticator::new()),
        )
        .await
        .unwrap();
    conn.close().await;

    assert_eq!(pool.active_sessions().await, 0);
}

#[tokio::test]
async fn failed_logout_still_evicts_the_entry() {
    let mock_server = MockServer::start().await;
    let (_, xml) = server_keypair();

    mount_public_key(&mock_server, &xml).await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json("tok-1"))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_string("session store down"))
        .mount(&mock_server)
        .await;

    let pool = pool();
    let conn = pool
        .get_connection(
            &mock_server.uri(),
            "user",
            "pw",
            "",
            Box::new(PasswordAuthenticator::new()),
        )
        .await
        .unwrap();

    // Close succeeds locally even though the server refused the logout.
    conn.close().await;
    assert_eq!(conn.connection_count(), 0);
    assert_eq!(pool.active_sessions().await, 0);
}
