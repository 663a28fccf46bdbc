//! Authentication service.
//!
//! Two kinds of token pass through here:
//!
//! - Identity provider (Firebase) ID tokens, verified once at login by an
//!   [`IdentityProvider`] and exchanged for our own token.
//! - Our own HS256 bearer tokens, issued and verified by [`TokenService`] on
//!   every authenticated request.

mod error;
mod firebase;
mod token;

pub use error::AuthError;
pub use firebase::{FIREBASE_JWKS_URL, FirebaseIdentityProvider};
pub use token::{Claims, TokenService};

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::models::AuthenticatedIdentity;

/// External identity provider that vouches for a user at login time.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a provider-issued ID token and return the identity it names.
    async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError>;
}

/// Exchange a provider ID token for one of our bearer tokens.
///
/// # Errors
///
/// Returns `AuthError::MissingProviderToken` for an empty token, the
/// provider's error if verification fails, or `AuthError::Signing`.
#[instrument(skip_all)]
pub async fn exchange_token(
    provider: &dyn IdentityProvider,
    tokens: &TokenService,
    provider_token: &str,
) -> Result<String, AuthError> {
    if provider_token.trim().is_empty() {
        return Err(AuthError::MissingProviderToken);
    }

    let identity = provider.verify_id_token(provider_token).await?;
    let token = tokens.issue(&identity)?;

    info!(user_id = %identity.user_id, "issued bearer token");
    Ok(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use secrecy::SecretString;
    use shoply_core::UserId;

    use super::*;

    struct StaticProvider;

    #[async_trait]
    impl IdentityProvider for StaticProvider {
        async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
            if token == "good" {
                Ok(AuthenticatedIdentity {
                    user_id: UserId::parse("uid-1").unwrap(),
                    email: "a@b.test".to_string(),
                    name: None,
                    picture: None,
                })
            } else {
                Err(AuthError::ProviderTokenRejected("bad".to_string()))
            }
        }
    }

    fn tokens() -> TokenService {
        TokenService::new(
            &SecretString::from("kX9$mQ2!vL7@pR4#wZ8&nB3*tY6^hJ1%"),
            Duration::hours(24),
        )
    }

    #[tokio::test]
    async fn test_exchange_issues_verifiable_token() {
        let tokens = tokens();
        let token = exchange_token(&StaticProvider, &tokens, "good").await.unwrap();
        assert_eq!(tokens.verify(&token).unwrap().user_id.as_str(), "uid-1");
    }

    #[tokio::test]
    async fn test_exchange_rejects_missing_and_bad_tokens() {
        let tokens = tokens();
        assert!(matches!(
            exchange_token(&StaticProvider, &tokens, "  ").await,
            Err(AuthError::MissingProviderToken)
        ));
        assert!(matches!(
            exchange_token(&StaticProvider, &tokens, "forged").await,
            Err(AuthError::ProviderTokenRejected(_))
        ));
    }
}
