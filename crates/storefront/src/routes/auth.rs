//! Authentication route handlers.
//!
//! The client signs in with Firebase, then trades the Firebase ID token for
//! one of our bearer tokens. Every other API call carries that bearer token.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::AuthenticatedIdentity;
use crate::services::auth::{AuthError, exchange_token};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/auth/token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default)]
    pub firebase_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    pub user: AuthenticatedIdentity,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/auth/token` - exchange a Firebase ID token for a bearer token.
#[instrument(skip(state, body))]
pub async fn token(
    State(state): State<AppState>,
    body: std::result::Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(request) = body?;
    let provider_token = request
        .firebase_token
        .ok_or(AppError::Auth(AuthError::MissingProviderToken))?;

    let token = exchange_token(state.identity_provider(), state.tokens(), &provider_token).await?;
    Ok(Json(TokenResponse { token }))
}

/// `GET /api/auth/verify` - echo the identity behind the bearer token.
#[instrument(skip_all)]
pub async fn verify(RequireAuth(identity): RequireAuth) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        message: "Token verified successfully",
        user: identity,
    })
}
