//! Development token minting.
//!
//! Signs a bearer token with the same secret and lifetime the storefront
//! uses, so the API can be exercised without a Firebase login.

use thiserror::Error;

use shoply_core::{UserId, UserIdError};
use shoply_storefront::config::{AuthConfig, ConfigError};
use shoply_storefront::models::AuthenticatedIdentity;
use shoply_storefront::services::auth::{AuthError, TokenService};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid uid: {0}")]
    InvalidUid(#[from] UserIdError),

    #[error("Signing failed: {0}")]
    Signing(#[from] AuthError),
}

/// Mint a bearer token for `uid`.
///
/// # Errors
///
/// Returns `TokenError` if auth configuration is missing or invalid, or the
/// uid is not acceptable.
pub fn mint(uid: &str, email: &str, name: Option<String>) -> Result<String, TokenError> {
    let _ = dotenvy::dotenv();
    let config = AuthConfig::from_env()?;
    let tokens = TokenService::from_config(&config);

    let identity = AuthenticatedIdentity {
        user_id: UserId::parse(uid)?,
        email: email.to_string(),
        name,
        picture: None,
    };

    let token = tokens.issue(&identity)?;
    tracing::info!(
        user_id = %identity.user_id,
        ttl_hours = tokens.ttl().num_hours(),
        "Minted development token"
    );
    Ok(token)
}
