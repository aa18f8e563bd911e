//! MD5 keyed-hash signature for generic API calls
//!
//! `sign = md5(k1 v1 k2 v2 ...)` over every parameter plus `client_secret`,
//! keys in ascending byte order, no separators. The secret only ever appears
//! inside the hash input; it is not sent on signed calls.

use crate::params::BizParams;

/// Parameter name under which the client secret enters the hash input.
pub const CLIENT_SECRET_KEY: &str = "client_secret";

/// Parameter name the signature is sent under.
pub const SIGN_KEY: &str = "sign";

/// Compute the lowercase hex MD5 signature of `params`.
///
/// A caller-supplied `client_secret` entry is overridden by `client_secret`.
pub fn request_sign(params: &BizParams, client_secret: &str) -> String {
    let mut params = params.clone();
    params.insert(CLIENT_SECRET_KEY, client_secret);
    format!("{:x}", md5::compute(canonical_string(&params).as_bytes()))
}

/// Concatenate `key + value` for every entry in canonical order.
pub fn canonical_string(params: &BizParams) -> String {
    params.iter().fold(String::new(), |mut acc, (key, value)| {
        acc.push_str(key);
        acc.push_str(&value.sign_repr());
        acc
    })
}
