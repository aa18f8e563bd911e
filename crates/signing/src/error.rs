//! Error types for signing and verification

/// Errors from local signing and callback verification.
///
/// None of these are retryable: a bad key or a malformed callback stays bad.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load private key: {0}")]
    KeyLoad(String),

    #[error("signing failed: {0}")]
    Sign(String),

    #[error("signature decryption failed: {0}")]
    Decrypt(String),

    #[error("malformed callback payload: {0}")]
    MalformedPayload(String),

    #[error("callback payload has no sign field")]
    MissingSignature,
}

/// Result alias for signing operations.
pub type Result<T> = std::result::Result<T, Error>;
