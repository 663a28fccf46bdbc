//! Integration tests for Shoply.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`
//! against in-memory storage, so no database or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shoply-integration-tests
//! ```
//!
//! Bearer tokens are minted with the real `TokenService` using the same
//! secret as the app under test. Firebase is replaced by [`FakeIdentityProvider`].

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::Duration;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use shoply_core::UserId;
use shoply_storefront::config::{AuthConfig, LogFormat, StorageBackend, StorefrontConfig};
use shoply_storefront::db::{MemoryStore, Stores};
use shoply_storefront::models::AuthenticatedIdentity;
use shoply_storefront::routes;
use shoply_storefront::services::auth::{AuthError, IdentityProvider, TokenService};
use shoply_storefront::state::AppState;

/// Signing secret shared by the app under test and the token helpers.
pub const TEST_JWT_SECRET: &str = "kX9$mQ2!vL7@pR4#wZ8&nB3*tY6^hJ1%";

/// Prefix of provider tokens accepted by [`FakeIdentityProvider`].
pub const FAKE_FIREBASE_PREFIX: &str = "firebase:";

/// Identity provider that accepts `firebase:<uid>:<email>` and rejects
/// everything else.
pub struct FakeIdentityProvider;

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let rest = token
            .strip_prefix(FAKE_FIREBASE_PREFIX)
            .ok_or_else(|| AuthError::ProviderTokenRejected("unknown token".to_string()))?;
        let (uid, email) = rest
            .split_once(':')
            .ok_or_else(|| AuthError::ProviderTokenRejected("malformed token".to_string()))?;
        let user_id = UserId::parse(uid)
            .map_err(|e| AuthError::ProviderTokenRejected(e.to_string()))?;

        Ok(AuthenticatedIdentity {
            user_id,
            email: email.to_string(),
            name: Some("Test User".to_string()),
            picture: None,
        })
    }
}

/// Configuration for the app under test.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 5000,
        storage: StorageBackend::Memory,
        database_url: None,
        auth: AuthConfig {
            jwt_secret: SecretString::from(TEST_JWT_SECRET),
            token_ttl_hours: 24,
            firebase_project_id: "shoply-test".to_string(),
        },
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        log_format: LogFormat::Pretty,
    }
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Value::Null` when the body is not JSON.
    pub json: Value,
    pub text: String,
}

impl TestResponse {
    /// The `message` field of a JSON body.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.json.get("message").and_then(Value::as_str)
    }
}

/// The storefront router over a fresh in-memory store.
pub struct TestApp {
    router: Router,
    tokens: TokenService,
    pub store: Arc<MemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            test_config(),
            Stores::from_memory(&store),
            Arc::new(FakeIdentityProvider),
        );

        Self {
            router: routes::router(state),
            tokens: TokenService::new(&SecretString::from(TEST_JWT_SECRET), Duration::hours(24)),
            store,
        }
    }

    /// A valid bearer token for `uid`.
    ///
    /// # Panics
    ///
    /// Panics if `uid` is not a valid user id.
    #[must_use]
    pub fn token_for(&self, uid: &str) -> String {
        let identity = AuthenticatedIdentity {
            user_id: UserId::parse(uid).expect("valid test uid"),
            email: format!("{uid}@shoply.test"),
            name: None,
            picture: None,
        };
        self.tokens.issue(&identity).expect("token signing")
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send(request).await
    }

    /// Send a raw request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
            text,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), None).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
