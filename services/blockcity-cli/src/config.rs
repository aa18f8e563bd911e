//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from BLOCKCITY_CLIENT_SECRET or
//! client_secret_file, never stored in the TOML directly to avoid leaking
//! it. The private key is always read from a file.

use blockcity_client::{Credentials, DEFAULT_PAY_EXPIRE, USER_INFO_URL};
use blockcity_signing::KeyMaterial;
use common::Secret;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Env var holding the client secret
pub const CLIENT_SECRET_ENV: &str = "BLOCKCITY_CLIENT_SECRET";

/// Env var holding the config file path
pub const CONFIG_PATH_ENV: &str = "BLOCKCITY_CONFIG";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub blockcity: BlockcityConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Platform endpoints and client registration
#[derive(Debug, Deserialize)]
pub struct BlockcityConfig {
    pub gateway: String,
    pub auth_url: String,
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to the env var)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    pub private_key_file: PathBuf,
    #[serde(default = "default_pay_expire")]
    pub pay_expire: String,
    #[serde(default = "default_user_info_url")]
    pub user_info_url: String,
}

/// Outbound HTTP settings
#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_pay_expire() -> String {
    DEFAULT_PAY_EXPIRE.to_owned()
}

fn default_user_info_url() -> String {
    USER_INFO_URL.to_owned()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. BLOCKCITY_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        let blockcity = &mut config.blockcity;
        for (name, url) in [
            ("gateway", &blockcity.gateway),
            ("auth_url", &blockcity.auth_url),
            ("user_info_url", &blockcity.user_info_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(common::Error::Config(format!(
                    "{name} must start with http:// or https://, got: {url}"
                )));
            }
        }

        if blockcity.client_id.trim().is_empty() {
            return Err(common::Error::Config("client_id must not be empty".into()));
        }

        if !is_valid_pay_expire(&blockcity.pay_expire) {
            return Err(common::Error::Config(format!(
                "pay_expire must be a number followed by m, h, d or c, got: {}",
                blockcity.pay_expire
            )));
        }

        if config.http.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        // Resolve client secret: env var takes precedence over file
        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            blockcity.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = blockcity.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                blockcity.client_secret = Some(Secret::new(secret));
            }
        }

        if blockcity.client_secret.is_none() {
            return Err(common::Error::Config(format!(
                "client secret not set: export {CLIENT_SECRET_ENV} or set client_secret_file"
            )));
        }

        Ok(config)
    }

    /// Build client credentials, reading and checking the private key.
    pub fn credentials(&self) -> common::Result<Credentials> {
        let blockcity = &self.blockcity;
        let client_secret = blockcity
            .client_secret
            .clone()
            .ok_or_else(|| common::Error::Config("client secret not resolved".into()))?;

        let private_key = KeyMaterial::from_file(&blockcity.private_key_file)
            .map_err(|e| common::Error::Config(e.to_string()))?;
        private_key.validate().map_err(|e| {
            common::Error::Config(format!(
                "{}: {e}",
                blockcity.private_key_file.display()
            ))
        })?;

        Ok(Credentials::new(
            blockcity.gateway.clone(),
            blockcity.auth_url.clone(),
            blockcity.client_id.clone(),
            client_secret,
            private_key,
        )
        .with_pay_expire(blockcity.pay_expire.clone()))
    }

    /// Resolve config file path from CLI arg or BLOCKCITY_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from("blockcity.toml")
    }
}

/// Expiry windows look like `30m`, `2h`, `1d` or `1c` (end of day).
fn is_valid_pay_expire(value: &str) -> bool {
    let Some((unit_index, unit)) = value.char_indices().last() else {
        return false;
    };
    let digits = &value[..unit_index];
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && matches!(unit, 'm' | 'h' | 'd' | 'c')
}
