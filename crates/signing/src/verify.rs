//! Callback signature verification
//!
//! The platform signs a callback by encrypting its canonical query string
//! with our RSA public key. Verification rebuilds the canonical string from
//! the received fields, decrypts `sign` with the private key one modulus-size
//! block at a time, and compares the two byte-for-byte.
//!
//! Canonical string: drop `sign`, sort the remaining keys by byte order,
//! replace top-level booleans with `"true"`/`"false"`, then query-encode
//! (see `query`).

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::Pkcs1v15Encrypt;
use rsa::traits::PublicKeyParts;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::key::KeyMaterial;
use crate::query::build_query;
use crate::request_sign::SIGN_KEY;

/// A callback split into its signature and the string that was signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCallback {
    /// Base64 ciphertext from the `sign` field.
    pub sign: String,
    /// Canonical query string of every other field.
    pub canonical: String,
}

/// Parse a JSON callback body and build its canonical string.
pub fn canonicalize(content: &str) -> Result<CanonicalCallback> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| Error::MalformedPayload(format!("invalid JSON: {e}")))?;
    let Value::Object(mut fields) = value else {
        return Err(Error::MalformedPayload(
            "callback body must be a JSON object".into(),
        ));
    };

    let sign = match fields.remove(SIGN_KEY) {
        None | Some(Value::Null) => return Err(Error::MissingSignature),
        Some(Value::String(sign)) => sign,
        Some(other) => {
            return Err(Error::MalformedPayload(format!(
                "sign must be a string, got {other}"
            )));
        }
    };

    let sorted: BTreeMap<String, Value> = fields
        .into_iter()
        .map(|(key, value)| match value {
            Value::Bool(b) => (key, Value::String(b.to_string())),
            other => (key, other),
        })
        .collect();

    let canonical = build_query(sorted.iter().map(|(k, v)| (k.as_str(), v)));
    Ok(CanonicalCallback { sign, canonical })
}

/// Verify a JSON callback body.
///
/// Returns `Ok(false)` when the signature decrypts cleanly but does not match
/// the payload. Errors are reserved for input that cannot be checked at all.
pub fn check_rsa_sign(content: &str, key: &KeyMaterial) -> Result<bool> {
    let callback = canonicalize(content)?;
    let plaintext = decrypt_sign(&callback.sign, key)?;

    let verified = plaintext == callback.canonical.as_bytes();
    if verified {
        debug!(canonical_len = callback.canonical.len(), "callback signature verified");
    } else {
        warn!(
            canonical_len = callback.canonical.len(),
            decrypted_len = plaintext.len(),
            "callback signature mismatch"
        );
    }
    Ok(verified)
}

/// Base64-decode and block-wise decrypt a callback signature.
///
/// The block size is the key's modulus length (256 bytes for RSA-2048), so a
/// rotated key of another size keeps working.
pub fn decrypt_sign(sign: &str, key: &KeyMaterial) -> Result<Vec<u8>> {
    let compact: String = sign.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let ciphertext = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::Decrypt(format!("sign is not valid base64: {e}")))?;

    key.with_key(|private_key| {
        let block_size = private_key.size();
        if ciphertext.is_empty() || ciphertext.len() % block_size != 0 {
            return Err(Error::Decrypt(format!(
                "ciphertext length {} is not a multiple of the {block_size}-byte key size",
                ciphertext.len()
            )));
        }

        let mut plaintext = Vec::with_capacity(ciphertext.len());
        for (index, block) in ciphertext.chunks(block_size).enumerate() {
            let part = private_key
                .decrypt(Pkcs1v15Encrypt, block)
                .map_err(|e| Error::Decrypt(format!("block {index}: {e}")))?;
            plaintext.extend_from_slice(&part);
        }
        Ok(plaintext)
    })
}
