//! Bearer tokens issued by this service.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. Verification is purely
//! local: no call to the identity provider is made per request.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use shoply_core::UserId;

use super::AuthError;
use crate::config::AuthConfig;
use crate::models::AuthenticatedIdentity;

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from a signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    /// Create a token service from the auth configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours))
    }

    /// Issue a token for `identity`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue(&self, identity: &AuthenticatedIdentity) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue_at(
        &self,
        identity: &AuthenticatedIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: identity.user_id.to_string(),
            email: identity.email.clone(),
            name: identity.name.clone().unwrap_or_default(),
            picture: identity.picture.clone().unwrap_or_default(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign token");
                AuthError::Signing(e.to_string())
            },
        )
    }

    /// Verify a token and recover the identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` if the signature, expiry or
    /// subject is invalid.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidCredential
            })?;

        let claims = data.claims;
        let user_id = UserId::parse(&claims.user_id).map_err(|_| AuthError::InvalidCredential)?;

        Ok(AuthenticatedIdentity {
            user_id,
            email: claims.email,
            name: non_empty(claims.name),
            picture: non_empty(claims.picture),
        })
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            &SecretString::from("kX9$mQ2!vL7@pR4#wZ8&nB3*tY6^hJ1%"),
            Duration::hours(24),
        )
    }

    fn identity() -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            user_id: UserId::parse("firebase-uid-123").unwrap(),
            email: "shopper@shoply.test".to_string(),
            name: Some("Shopper".to_string()),
            picture: None,
        }
    }

    #[test]
    fn test_issue_then_verify_recovers_identity() {
        let tokens = service();
        let token = tokens.issue(&identity()).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), identity());
    }

    #[test]
    fn test_claims_use_camel_case_and_24h_expiry() {
        let tokens = service();
        let now = Utc::now();
        let token = tokens.issue_at(&identity(), now).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let data = jsonwebtoken::decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"unused"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims["userId"], "firebase-uid-123");
        assert_eq!(data.claims["picture"], "");
        assert_eq!(
            data.claims["exp"].as_i64().unwrap() - data.claims["iat"].as_i64().unwrap(),
            24 * 60 * 60
        );
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let tokens = service();
        let token = tokens
            .issue_at(&identity(), Utc::now() - Duration::days(2))
            .unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(AuthError::InvalidCredential)
        ));
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let other = TokenService::new(
            &SecretString::from("Zq7!rT2@yU8#iO4$pA6%sD1^fG5&hJ9*"),
            Duration::hours(24),
        );
        let token = other.issue(&identity()).unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidCredential)
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(
            service().verify("not.a.jwt"),
            Err(AuthError::InvalidCredential)
        ));
    }
}
