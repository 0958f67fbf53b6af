//! RSA public-key exchange material and local password encryption.
//!
//! The server publishes its key as RSA key-value XML
//! (`<RSAKeyValue><Modulus>..</Modulus><Exponent>..</Exponent></RSAKeyValue>`).
//! Only the public half is needed here; private CRT elements are tolerated
//! and ignored. Passwords are encrypted with RSA-OAEP-SHA1, which is what
//! the server expects, and shipped base64-encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::{BigUint, Oaep, RsaPublicKey};
use sha1::Sha1;

use sessmux_core::ClientError;

/// Decode an RSA public key from its XML exchange format.
pub(crate) fn decode_public_key(xml: &str) -> Result<RsaPublicKey, ClientError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ClientError::KeyFormat(format!("invalid XML: {}", e)))?;

    let root = doc.root_element();
    if root.tag_name().name() != "RSAKeyValue" {
        return Err(ClientError::KeyFormat(format!(
            "unexpected root element '{}'",
            root.tag_name().name()
        )));
    }

    let mut modulus = None;
    let mut exponent = None;
    for node in root.children().filter(|n| n.is_element()) {
        let text = node.text().unwrap_or_default().trim();
        match node.tag_name().name() {
            "Modulus" => modulus = Some(decode_field("Modulus", text)?),
            "Exponent" => exponent = Some(decode_field("Exponent", text)?),
            // P, Q, DP, DQ, InverseQ, D: private-key material a server
            // should not be sending; not needed for encryption.
            _ => {}
        }
    }

    let modulus = modulus.ok_or_else(|| ClientError::KeyFormat("missing Modulus".to_string()))?;
    let exponent = exponent.ok_or_else(|| ClientError::KeyFormat("missing Exponent".to_string()))?;

    RsaPublicKey::new(
        BigUint::from_bytes_be(&modulus),
        BigUint::from_bytes_be(&exponent),
    )
    .map_err(|e| ClientError::KeyFormat(e.to_string()))
}

fn decode_field(name: &str, text: &str) -> Result<Vec<u8>, ClientError> {
    STANDARD
        .decode(text)
        .map_err(|e| ClientError::KeyFormat(format!("{} is not valid base64: {}", name, e)))
}

/// Encrypt `password` under the server's public key; returns base64
/// ciphertext for the session-creation request.
pub(crate) fn encrypt_password(public_key_xml: &str, password: &str) -> Result<String, ClientError> {
    let key = decode_public_key(public_key_xml)?;
    let mut rng = rand::thread_rng();

    let ciphertext = key
        .encrypt(&mut rng, Oaep::new::<Sha1>(), password.as_bytes())
        .map_err(|e| ClientError::KeyFormat(format!("password encryption failed: {}", e)))?;

    Ok(STANDARD.encode(ciphertext))
}
