//! RSA PKCS#1 v1.5 / SHA-256 signature for payment requests

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::key::KeyMaterial;

/// Sign `data` and return the standard base64 encoding of the signature.
///
/// For payment orders `data` is `biz_content` immediately followed by the
/// millisecond timestamp.
pub fn rsa_sign(data: &str, key: &KeyMaterial) -> Result<String> {
    let digest = Sha256::digest(data.as_bytes());
    let signature = key.with_key(|private_key| {
        private_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| Error::Sign(e.to_string()))
    })?;
    Ok(STANDARD.encode(signature))
}
