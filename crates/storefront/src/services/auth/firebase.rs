//! Firebase ID token verification.
//!
//! Verifies RS256 ID tokens against Google's published key set for
//! `securetoken@system.gserviceaccount.com`. The key set is cached for one
//! hour and refetched when a token names an unknown `kid`, which covers
//! Google's key rotation. Forced refetches are limited to one per
//! [`KEY_SET_REFRESH_COOLDOWN`] so forged `kid`s cannot drive outbound traffic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use shoply_core::UserId;

use super::{AuthError, IdentityProvider};
use crate::models::AuthenticatedIdentity;

/// Google's JWK endpoint for Firebase ID token signing keys.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const KEY_SET_CACHE_KEY: &str = "securetoken";
const KEY_SET_TTL: Duration = Duration::from_secs(60 * 60);

/// Minimum spacing between two fetches of the key set.
pub const KEY_SET_REFRESH_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Verifies Firebase ID tokens for one project.
#[derive(Clone)]
pub struct FirebaseIdentityProvider {
    client: reqwest::Client,
    jwks_url: String,
    validation: Validation,
    keys: Cache<&'static str, Arc<JwkSet>>,
    // Present while a fetch happened within the cooldown
    recently_fetched: Cache<&'static str, ()>,
}

impl FirebaseIdentityProvider {
    /// Create a verifier for `project_id` using Google's key endpoint.
    #[must_use]
    pub fn new(project_id: &str) -> Self {
        Self::with_jwks_url(project_id, FIREBASE_JWKS_URL)
    }

    /// Create a verifier that fetches keys from a custom endpoint.
    #[must_use]
    pub fn with_jwks_url(project_id: &str, jwks_url: &str) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{project_id}")]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);

        let keys = Cache::builder()
            .max_capacity(1)
            .time_to_live(KEY_SET_TTL)
            .build();
        let recently_fetched = Cache::builder()
            .max_capacity(1)
            .time_to_live(KEY_SET_REFRESH_COOLDOWN)
            .build();

        Self {
            client: reqwest::Client::new(),
            jwks_url: jwks_url.to_string(),
            validation,
            keys,
            recently_fetched,
        }
    }

    /// Return the cached key set, fetching it if absent or if `refresh`.
    async fn key_set(&self, refresh: bool) -> Result<Arc<JwkSet>, AuthError> {
        if !refresh {
            if let Some(keys) = self.keys.get(KEY_SET_CACHE_KEY).await {
                return Ok(keys);
            }
        }

        debug!(url = %self.jwks_url, "fetching identity provider key set");
        self.recently_fetched.insert(KEY_SET_CACHE_KEY, ()).await;
        let keys: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        let keys = Arc::new(keys);
        self.keys.insert(KEY_SET_CACHE_KEY, keys.clone()).await;
        Ok(keys)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let mut keys = self.key_set(false).await?;
        if keys.find(kid).is_none() {
            if self.recently_fetched.contains_key(KEY_SET_CACHE_KEY) {
                debug!(kid, "unknown key id, key set refreshed recently");
            } else {
                keys = self.key_set(true).await?;
            }
        }

        let jwk = keys
            .find(kid)
            .ok_or_else(|| AuthError::ProviderTokenRejected(format!("unknown key id {kid}")))?;

        DecodingKey::from_jwk(jwk).map_err(|e| AuthError::ProviderTokenRejected(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    #[instrument(skip(self, token))]
    async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AuthError::ProviderTokenRejected(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::ProviderTokenRejected("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let data = jsonwebtoken::decode::<FirebaseClaims>(token, &key, &self.validation)
            .map_err(|e| {
                warn!(error = %e, "identity provider token rejected");
                AuthError::ProviderTokenRejected(e.to_string())
            })?;

        let claims = data.claims;
        let user_id = UserId::parse(&claims.sub)
            .map_err(|e| AuthError::ProviderTokenRejected(e.to_string()))?;

        Ok(AuthenticatedIdentity {
            user_id,
            email: claims.email.unwrap_or_default(),
            name: claims.name.filter(|n| !n.is_empty()),
            picture: claims.picture.filter(|p| !p.is_empty()),
        })
    }
}
