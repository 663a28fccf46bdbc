//! Cart service.
//!
//! Each operation is one read-modify-write of a single cart document:
//! check ownership, load, apply a [`Cart`] mutation, save the whole document.

use tracing::{info, instrument};

use shoply_core::{Cart, CartId, CartItemId, Decrease, NewCartItem, UserId};

use crate::db::CartStore;
use crate::error::{AppError, Result};
use crate::models::AuthenticatedIdentity;
use crate::services::ownership::ensure_owner;

const RESOURCE: &str = "cart";

/// Cart operations on behalf of an authenticated caller.
pub struct CartService<'a> {
    carts: &'a dyn CartStore,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(carts: &'a dyn CartStore) -> Self {
        Self { carts }
    }

    /// Fetch the caller's cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner or
    /// `AppError::Database` on storage failure.
    #[instrument(skip(self, identity), fields(uid = %owner))]
    pub async fn get(&self, identity: &AuthenticatedIdentity, owner: &UserId) -> Result<Option<Cart>> {
        ensure_owner(identity, owner, RESOURCE)?;
        Ok(self.carts.find_by_owner(owner).await?)
    }

    /// Add a line, creating the cart on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner or
    /// `AppError::Database` on storage failure.
    #[instrument(skip(self, identity, item), fields(uid = %owner, web_id = item.web_id))]
    pub async fn add_item(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        item: NewCartItem,
    ) -> Result<Cart> {
        ensure_owner(identity, owner, RESOURCE)?;

        let mut cart = match self.carts.find_by_owner(owner).await? {
            Some(cart) => cart,
            None => {
                info!("creating cart");
                self.carts.create_empty(owner.clone())
            }
        };

        cart.add_item(item);
        Ok(self.carts.save(&cart).await?)
    }

    /// Increase one line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the cart or line is missing.
    #[instrument(skip(self, identity), fields(uid = %owner, item_id = %item_id))]
    pub async fn increase(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        item_id: CartItemId,
    ) -> Result<Cart> {
        let mut cart = self.load_owned(identity, owner).await?;
        cart.increase(item_id)?;
        Ok(self.carts.save(&cart).await?)
    }

    /// Decrease one line's quantity by one, removing it at quantity one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the cart or line is missing.
    #[instrument(skip(self, identity), fields(uid = %owner, item_id = %item_id))]
    pub async fn decrease(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        item_id: CartItemId,
    ) -> Result<Cart> {
        let mut cart = self.load_owned(identity, owner).await?;
        if cart.decrease(item_id)? == Decrease::Removed {
            info!("line removed at quantity one");
        }
        Ok(self.carts.save(&cart).await?)
    }

    /// Remove one line regardless of quantity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the cart or line is missing.
    #[instrument(skip(self, identity), fields(uid = %owner, item_id = %item_id))]
    pub async fn remove_item(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        item_id: CartItemId,
    ) -> Result<()> {
        let mut cart = self.load_owned(identity, owner).await?;
        cart.remove_item(item_id)?;
        self.carts.save(&cart).await?;
        Ok(())
    }

    /// Empty a cart addressed by its own identifier.
    ///
    /// The cart is loaded and its recorded owner checked before anything is
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no cart has this id, or
    /// `AppError::Forbidden` if it belongs to someone else.
    #[instrument(skip(self, identity), fields(cart_id = %cart_id))]
    pub async fn clear(&self, identity: &AuthenticatedIdentity, cart_id: CartId) -> Result<Cart> {
        let cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or_else(cart_not_found)?;

        ensure_owner(identity, &cart.owner, RESOURCE)?;

        let cleared = self
            .carts
            .clear_items(cart_id)
            .await?
            .ok_or_else(cart_not_found)?;

        info!(uid = %cleared.owner, "cart cleared");
        Ok(cleared)
    }

    async fn load_owned(&self, identity: &AuthenticatedIdentity, owner: &UserId) -> Result<Cart> {
        ensure_owner(identity, owner, RESOURCE)?;
        self.carts
            .find_by_owner(owner)
            .await?
            .ok_or_else(cart_not_found)
    }
}

fn cart_not_found() -> AppError {
    AppError::NotFound("Cart not found".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use shoply_core::{Price, Quantity};

    use super::*;
    use crate::db::MemoryStore;

    fn identity(uid: &str) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            user_id: UserId::parse(uid).unwrap(),
            email: format!("{uid}@shoply.test"),
            name: None,
            picture: None,
        }
    }

    fn red_shirt() -> NewCartItem {
        NewCartItem {
            title: "Test Product".to_string(),
            image: "test-image.jpg".to_string(),
            price: Price::new(Decimal::from_str("29.99").unwrap()).unwrap(),
            color: "Red".to_string(),
            quantity: Quantity::ONE,
            web_id: 12345,
        }
    }

    #[tokio::test]
    async fn test_lifecycle_through_store() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);
        let me = identity("test-user-id");
        let uid = me.user_id.clone();

        let cart = service.add_item(&me, &uid, red_shirt()).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        let item_id = cart.items[0].id;

        let cart = service.add_item(&me, &uid, red_shirt()).await.unwrap();
        assert_eq!(cart.items[0].quantity.get(), 2);

        let cart = service.increase(&me, &uid, item_id).await.unwrap();
        assert_eq!(cart.items[0].quantity.get(), 3);

        service.decrease(&me, &uid, item_id).await.unwrap();
        let cart = service.decrease(&me, &uid, item_id).await.unwrap();
        assert_eq!(cart.items[0].quantity.get(), 1);

        let cart = service.decrease(&me, &uid, item_id).await.unwrap();
        assert!(cart.items.is_empty());

        let stored = service.get(&me, &uid).await.unwrap().unwrap();
        assert!(stored.items.is_empty());
    }

    #[tokio::test]
    async fn test_get_without_cart_is_none() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);
        let me = identity("nobody-yet");
        assert!(service.get(&me, &me.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_foreign_owner_is_forbidden_and_cart_unchanged() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);
        let owner = identity("owner");
        let intruder = identity("intruder");

        let cart = service
            .add_item(&owner, &owner.user_id, red_shirt())
            .await
            .unwrap();
        let item_id = cart.items[0].id;

        let err = service
            .increase(&intruder, &owner.user_id, item_id)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = service
            .add_item(&intruder, &owner.user_id, red_shirt())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let stored = service.get(&owner, &owner.user_id).await.unwrap().unwrap();
        assert_eq!(stored, cart);
    }

    #[tokio::test]
    async fn test_clear_by_id_checks_owner_before_clearing() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);
        let owner = identity("owner");
        let intruder = identity("intruder");

        let cart = service
            .add_item(&owner, &owner.user_id, red_shirt())
            .await
            .unwrap();

        let err = service.clear(&intruder, cart.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        let stored = service.get(&owner, &owner.user_id).await.unwrap().unwrap();
        assert_eq!(stored.items.len(), 1);

        let cleared = service.clear(&owner, cart.id).await.unwrap();
        assert_eq!(cleared.id, cart.id);
        assert!(cleared.items.is_empty());
    }

    #[tokio::test]
    async fn test_missing_cart_and_item_are_not_found() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);
        let me = identity("me");

        let err = service
            .increase(&me, &me.user_id, CartItemId::generate())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Cart not found");

        service.add_item(&me, &me.user_id, red_shirt()).await.unwrap();
        for result in [
            service.increase(&me, &me.user_id, CartItemId::generate()).await.map(|_| ()),
            service.decrease(&me, &me.user_id, CartItemId::generate()).await.map(|_| ()),
            service.remove_item(&me, &me.user_id, CartItemId::generate()).await,
        ] {
            assert_eq!(result.unwrap_err().status(), StatusCode::NOT_FOUND);
        }

        let err = service.clear(&me, CartId::generate()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_item_drops_line() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);
        let me = identity("me");

        let mut blue = red_shirt();
        blue.color = "Blue".to_string();
        service.add_item(&me, &me.user_id, red_shirt()).await.unwrap();
        let cart = service.add_item(&me, &me.user_id, blue).await.unwrap();
        assert_eq!(cart.items.len(), 2);

        service
            .remove_item(&me, &me.user_id, cart.items[0].id)
            .await
            .unwrap();
        let stored = service.get(&me, &me.user_id).await.unwrap().unwrap();
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].color, "Blue");
    }
}
