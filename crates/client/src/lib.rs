//! Blockcity open platform client
//!
//! Wraps the four platform interactions on top of `blockcity-signing`:
//! 1. Send the user to `ApiClient::authorization_url()`
//! 2. Trade the returned code via `ApiClient::exchange_token()`
//! 3. Read the profile with `ApiClient::fetch_user()` (MD5-signed)
//! 4. Place payments with `ApiClient::create_pay_order()` (RSA-signed)
//!
//! Payment notifications are checked with `ApiClient::check_rsa_sign()`.
//! Every call is a single request/response with no retries.

pub mod authorize;
pub mod client;
pub mod constants;
pub mod credentials;
pub mod envelope;
pub mod error;

pub use authorize::build_authorization_url;
pub use client::{ApiClient, PayOrderResult, TokenResult, UserInfo};
pub use constants::*;
pub use credentials::Credentials;
pub use error::{Endpoint, Error, RemotePayload, Result};
