//! Client credentials
//!
//! Loaded once and never mutated. The private key stays as PEM text; each
//! signing or decryption call parses its own short-lived key handle.

use blockcity_signing::KeyMaterial;
use common::Secret;

use crate::constants::DEFAULT_PAY_EXPIRE;

/// Everything needed to talk to the platform as one registered client.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Gateway base URL, without a trailing slash
    pub gateway: String,
    /// Token endpoint for authorization-code exchange
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub private_key: KeyMaterial,
    /// Business-level payment expiry passed through as `pay_expire`
    pub pay_expire: String,
}

impl Credentials {
    pub fn new(
        gateway: impl Into<String>,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        private_key: KeyMaterial,
    ) -> Self {
        let gateway: String = gateway.into();
        Self {
            gateway: gateway.trim_end_matches('/').to_owned(),
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            client_secret,
            private_key,
            pay_expire: DEFAULT_PAY_EXPIRE.to_owned(),
        }
    }

    pub fn with_pay_expire(mut self, pay_expire: impl Into<String>) -> Self {
        self.pay_expire = pay_expire.into();
        self
    }
}
