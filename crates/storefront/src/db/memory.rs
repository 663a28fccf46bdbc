//! In-memory implementation of every store trait.
//!
//! Used by the test suites and by `STOREFRONT_STORAGE=memory` for local
//! development. Carts and order histories are keyed by owner, which gives the
//! same one-document-per-user guarantee as the unique index in `PostgreSQL`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shoply_core::{AddressId, Cart, CartId, UserId, WishlistItemId};

use super::{
    AddressStore, CartStore, OrderHistoryStore, RepositoryError, StorageHealth, WishlistStore,
};
use crate::models::{Address, AddressFields, OrderHistory, WishlistItem};

/// Process-local document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    carts: RwLock<HashMap<UserId, Cart>>,
    wishlist: RwLock<Vec<WishlistItem>>,
    addresses: RwLock<Vec<Address>>,
    orders: RwLock<HashMap<UserId, OrderHistory>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored carts.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.carts.read().await.get(owner).cloned())
    }

    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .carts
            .read()
            .await
            .values()
            .find(|cart| cart.id == id)
            .cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError> {
        let mut carts = self.carts.write().await;
        let stored = carts
            .entry(cart.owner.clone())
            .and_modify(|existing| existing.items.clone_from(&cart.items))
            .or_insert_with(|| cart.clone());
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: CartId) -> Result<bool, RepositoryError> {
        let mut carts = self.carts.write().await;
        let before = carts.len();
        carts.retain(|_, cart| cart.id != id);
        Ok(carts.len() < before)
    }

    async fn clear_items(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let mut carts = self.carts.write().await;
        Ok(carts.values_mut().find(|cart| cart.id == id).map(|cart| {
            cart.clear();
            cart.clone()
        }))
    }
}

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn insert(&self, item: &WishlistItem) -> Result<WishlistItem, RepositoryError> {
        let mut wishlist = self.wishlist.write().await;
        if wishlist.iter().any(|existing| existing.id == item.id) {
            return Err(RepositoryError::Conflict(format!(
                "wishlist item {} already exists",
                item.id
            )));
        }
        wishlist.push(item.clone());
        Ok(item.clone())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<WishlistItem>, RepositoryError> {
        Ok(self
            .wishlist
            .read()
            .await
            .iter()
            .filter(|item| &item.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: WishlistItemId,
    ) -> Result<Option<WishlistItem>, RepositoryError> {
        Ok(self
            .wishlist
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn delete_by_id(&self, id: WishlistItemId) -> Result<bool, RepositoryError> {
        let mut wishlist = self.wishlist.write().await;
        let before = wishlist.len();
        wishlist.retain(|item| item.id != id);
        Ok(wishlist.len() < before)
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn insert(&self, address: &Address) -> Result<Address, RepositoryError> {
        let mut addresses = self.addresses.write().await;
        if addresses.iter().any(|existing| existing.id == address.id) {
            return Err(RepositoryError::Conflict(format!(
                "address {} already exists",
                address.id
            )));
        }
        addresses.push(address.clone());
        Ok(address.clone())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Address>, RepositoryError> {
        Ok(self
            .addresses
            .read()
            .await
            .iter()
            .filter(|address| &address.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        Ok(self
            .addresses
            .read()
            .await
            .iter()
            .find(|address| address.id == id)
            .cloned())
    }

    async fn update(
        &self,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Option<Address>, RepositoryError> {
        let mut addresses = self.addresses.write().await;
        Ok(addresses
            .iter_mut()
            .find(|address| address.id == id)
            .map(|address| {
                address.fields = fields.clone();
                address.clone()
            }))
    }

    async fn delete_by_id(&self, id: AddressId) -> Result<bool, RepositoryError> {
        let mut addresses = self.addresses.write().await;
        let before = addresses.len();
        addresses.retain(|address| address.id != id);
        Ok(addresses.len() < before)
    }
}

#[async_trait]
impl OrderHistoryStore for MemoryStore {
    async fn find_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<OrderHistory>, RepositoryError> {
        Ok(self.orders.read().await.get(owner).cloned())
    }

    async fn save(&self, history: &OrderHistory) -> Result<OrderHistory, RepositoryError> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .entry(history.owner.clone())
            .and_modify(|existing| existing.orders.clone_from(&history.orders))
            .or_insert_with(|| history.clone());
        Ok(stored.clone())
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
