//! Error types for platform calls

use std::fmt;

/// The platform operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    UserInfo,
    PayOrder,
    Token,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserInfo => "user info",
            Self::PayOrder => "pay order",
            Self::Token => "token",
        };
        f.write_str(name)
    }
}

/// What the platform reported on failure.
///
/// User-info and pay-order calls report an `errorCode`; the token endpoint
/// has no error field, so the whole response body is kept instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePayload {
    ErrorCode(String),
    Body(String),
}

impl fmt::Display for RemotePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ErrorCode(code) => write!(f, "errorCode {code}"),
            Self::Body(body) => write!(f, "response {body}"),
        }
    }
}

/// Errors from platform calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{endpoint} call rejected: {payload}")]
    Remote {
        endpoint: Endpoint,
        payload: RemotePayload,
    },

    #[error("{endpoint} call returned an unreadable response: {body}")]
    InvalidResponse { endpoint: Endpoint, body: String },

    #[error("encoding request failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Signing(#[from] blockcity_signing::Error),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
