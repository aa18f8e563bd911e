//! Blockcity request signing and callback verification
//!
//! Two signing schemes are used by the Blockcity open platform:
//! - generic API calls carry an MD5 keyed hash over the sorted parameters
//!   plus the client secret (`request_sign`)
//! - payment orders carry an RSA PKCS#1 v1.5 / SHA-256 signature over
//!   `biz_content + timestamp` (`rsa_sign`)
//!
//! Inbound payment callbacks are "encrypt-to-sign": the platform encrypts the
//! canonical query string of the callback with our public key, and we decrypt
//! the `sign` field with our private key and compare (`check_rsa_sign`).
//!
//! Everything here is pure over bytes and parameters; the HTTP side lives in
//! `blockcity-client`.

pub mod error;
pub mod key;
pub mod params;
pub mod query;
pub mod request_sign;
pub mod rsa_sign;
pub mod timestamp;
pub mod verify;

pub use error::{Error, Result};
pub use key::KeyMaterial;
pub use params::{BizParams, ParamValue};
pub use request_sign::request_sign;
pub use rsa_sign::rsa_sign;
pub use timestamp::Millis;
pub use verify::{CanonicalCallback, canonicalize, check_rsa_sign};
