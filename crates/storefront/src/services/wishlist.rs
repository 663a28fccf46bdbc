//! Wishlist service.

use tracing::instrument;

use shoply_core::{UserId, WishlistItemId};

use crate::db::WishlistStore;
use crate::error::{AppError, Result};
use crate::models::{AuthenticatedIdentity, NewWishlistItem, WishlistItem};
use crate::services::ownership::ensure_owner;

const RESOURCE: &str = "wishlist";

/// Wishlist operations on behalf of an authenticated caller.
pub struct WishlistService<'a> {
    wishlist: &'a dyn WishlistStore,
}

impl<'a> WishlistService<'a> {
    #[must_use]
    pub const fn new(wishlist: &'a dyn WishlistStore) -> Self {
        Self { wishlist }
    }

    /// Save a product to the caller's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner.
    #[instrument(skip(self, identity, item), fields(uid = %owner))]
    pub async fn add(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        item: NewWishlistItem,
    ) -> Result<WishlistItem> {
        ensure_owner(identity, owner, RESOURCE)?;
        let item = WishlistItem::new(owner.clone(), item);
        Ok(self.wishlist.insert(&item).await?)
    }

    /// List the caller's wishlist in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner.
    #[instrument(skip(self, identity), fields(uid = %owner))]
    pub async fn list(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
    ) -> Result<Vec<WishlistItem>> {
        ensure_owner(identity, owner, RESOURCE)?;
        Ok(self.wishlist.list_by_owner(owner).await?)
    }

    /// Remove one entry by id, after checking it belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` or `AppError::Forbidden`.
    #[instrument(skip(self, identity), fields(item_id = %id))]
    pub async fn remove(&self, identity: &AuthenticatedIdentity, id: WishlistItemId) -> Result<()> {
        let item = self
            .wishlist
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        ensure_owner(identity, &item.owner, RESOURCE)?;

        if !self.wishlist.delete_by_id(id).await? {
            return Err(AppError::NotFound("Item not found".to_string()));
        }
        Ok(())
    }
}
