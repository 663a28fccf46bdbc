//! Resource ownership checks.
//!
//! Every read and write of a per-user document passes through
//! [`ensure_owner`]. For create and list operations the owner is the one
//! named in the request; for by-id operations it is the owner recorded on
//! the loaded document, checked before anything is modified.

use tracing::warn;

use shoply_core::UserId;

use crate::error::AppError;
use crate::models::AuthenticatedIdentity;

/// Reject the request unless `identity` is `owner`.
///
/// Comparison is exact and case-sensitive.
///
/// # Errors
///
/// Returns `AppError::Forbidden` naming `resource` on mismatch.
pub fn ensure_owner(
    identity: &AuthenticatedIdentity,
    owner: &UserId,
    resource: &str,
) -> Result<(), AppError> {
    if &identity.user_id == owner {
        return Ok(());
    }

    warn!(
        user_id = %identity.user_id,
        owner = %owner,
        resource,
        "ownership check failed"
    );
    Err(AppError::Forbidden(format!(
        "Unauthorized: You can only access your own {resource}"
    )))
}
