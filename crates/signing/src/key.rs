//! Private key material with scoped key-handle acquisition
//!
//! The PEM text is held for the life of the client, but a parsed
//! `RsaPrivateKey` only exists for the duration of one signing or decryption
//! call. `RsaPrivateKey` zeroizes itself on drop, so the handle is wiped on
//! every exit path, including errors from the closure.

use std::path::Path;

use common::Secret;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use tracing::debug;

use crate::error::{Error, Result};

/// PEM-encoded RSA private key (PKCS#8 or PKCS#1).
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pem: Secret<String>,
}

impl KeyMaterial {
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self {
            pem: Secret::new(pem.into()),
        }
    }

    /// Read key material from a file. The file is read once; parsing is
    /// deferred until the key is used.
    pub fn from_file(path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path)
            .map_err(|e| Error::KeyLoad(format!("reading {}: {e}", path.display())))?;
        debug!(path = %path.display(), "read private key file");
        Ok(Self::from_pem(pem))
    }

    /// Parse the key, hand it to `f`, and drop it before returning.
    pub fn with_key<T>(&self, f: impl FnOnce(&RsaPrivateKey) -> Result<T>) -> Result<T> {
        let key = parse_private_key(self.pem.expose())?;
        f(&key)
    }

    /// Check that the material parses, without keeping the key around.
    pub fn validate(&self) -> Result<()> {
        self.with_key(|_| Ok(()))
    }
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    let pem = pem.trim();
    RsaPrivateKey::from_pkcs8_pem(pem).or_else(|pkcs8_err| {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(|pkcs1_err| {
            Error::KeyLoad(format!(
                "not a PKCS#8 ({pkcs8_err}) or PKCS#1 ({pkcs1_err}) PEM private key"
            ))
        })
    })
}
