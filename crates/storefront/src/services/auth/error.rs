//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while verifying or issuing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on the request.
    #[error("authentication token is missing")]
    MissingCredential,

    /// Bearer token present but malformed, badly signed or expired.
    #[error("invalid or expired token")]
    InvalidCredential,

    /// The login exchange was called without a provider token.
    #[error("identity provider token is missing")]
    MissingProviderToken,

    /// The identity provider token failed verification.
    #[error("identity provider token rejected: {0}")]
    ProviderTokenRejected(String),

    /// The identity provider's signing keys could not be fetched.
    #[error("identity provider key set unavailable: {0}")]
    KeySetUnavailable(String),

    /// Our own token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),
}
