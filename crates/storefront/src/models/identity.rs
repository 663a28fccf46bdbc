//! The identity attached to an authenticated request.

use serde::{Deserialize, Serialize};

use shoply_core::UserId;

/// Who the caller is, derived from a verified bearer token.
///
/// Never persisted. Lives for the duration of one request and is handed to
/// handlers through the `RequireAuth` extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    /// Stable subject issued by the identity provider.
    pub user_id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}
