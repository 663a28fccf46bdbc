//! Document storage for the storefront.
//!
//! Every document type sits behind an object-safe store trait so the
//! application can run against `PostgreSQL` in production and against the
//! in-memory [`MemoryStore`] in tests and local development.
//!
//! ## Tables (schema `storefront`)
//!
//! - `cart` - One row per owner; line items in a JSONB column
//! - `wishlist_item` - One row per saved product
//! - `address` - Address book entries
//! - `order_history` - One row per owner; orders in a JSONB column
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shoply-cli -- migrate
//! ```
//!
//! Writes are single-document. There are no multi-document transactions and
//! concurrent writers to the same document resolve as last-write-wins.

pub mod addresses;
pub mod carts;
pub mod memory;
pub mod orders;
pub mod wishlist;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shoply_core::{AddressId, Cart, CartId, UserId, WishlistItemId};

use crate::models::{Address, AddressFields, OrderHistory, WishlistItem};

pub use addresses::PgAddressStore;
pub use carts::PgCartStore;
pub use memory::MemoryStore;
pub use orders::PgOrderHistoryStore;
pub use wishlist::PgWishlistStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

// =============================================================================
// Store Traits
// =============================================================================

/// Access to cart documents. At most one cart exists per owner.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the cart belonging to `owner`.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Cart>, RepositoryError>;

    /// Load a cart by its identifier.
    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError>;

    /// Upsert the whole document, keyed by owner. `items` is overwritten.
    ///
    /// Returns the stored document. If another cart for the same owner was
    /// saved first, the stored identifier is the existing one.
    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError>;

    /// Delete a cart. Returns whether a row was removed.
    async fn delete_by_id(&self, id: CartId) -> Result<bool, RepositoryError>;

    /// Empty a cart's items in place.
    async fn clear_items(&self, id: CartId) -> Result<Option<Cart>, RepositoryError>;

    /// A fresh empty cart for `owner`. Not persisted until `save`.
    fn create_empty(&self, owner: UserId) -> Cart {
        Cart::new(owner)
    }
}

/// Access to wishlist entries.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    async fn insert(&self, item: &WishlistItem) -> Result<WishlistItem, RepositoryError>;

    /// All entries of `owner` in insertion order.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<WishlistItem>, RepositoryError>;

    async fn find_by_id(&self, id: WishlistItemId)
    -> Result<Option<WishlistItem>, RepositoryError>;

    async fn delete_by_id(&self, id: WishlistItemId) -> Result<bool, RepositoryError>;
}

/// Access to address book entries.
#[async_trait]
pub trait AddressStore: Send + Sync {
    async fn insert(&self, address: &Address) -> Result<Address, RepositoryError>;

    /// All addresses of `owner` in insertion order.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Address>, RepositoryError>;

    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError>;

    /// Replace the editable fields. The owner never changes.
    async fn update(
        &self,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Option<Address>, RepositoryError>;

    async fn delete_by_id(&self, id: AddressId) -> Result<bool, RepositoryError>;
}

/// Access to order history documents. At most one exists per owner.
#[async_trait]
pub trait OrderHistoryStore: Send + Sync {
    async fn find_by_owner(&self, owner: &UserId)
    -> Result<Option<OrderHistory>, RepositoryError>;

    /// Upsert the whole document, keyed by owner.
    async fn save(&self, history: &OrderHistory) -> Result<OrderHistory, RepositoryError>;
}

/// Storage liveness, used by the readiness probe.
#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepositoryError>;
}

// =============================================================================
// Store Bundle
// =============================================================================

/// The set of stores the application runs against.
#[derive(Clone)]
pub struct Stores {
    pub carts: Arc<dyn CartStore>,
    pub wishlist: Arc<dyn WishlistStore>,
    pub addresses: Arc<dyn AddressStore>,
    pub orders: Arc<dyn OrderHistoryStore>,
    pub health: Arc<dyn StorageHealth>,
}

impl Stores {
    /// `PostgreSQL`-backed stores sharing one pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            carts: Arc::new(PgCartStore::new(pool.clone())),
            wishlist: Arc::new(PgWishlistStore::new(pool.clone())),
            addresses: Arc::new(PgAddressStore::new(pool.clone())),
            orders: Arc::new(PgOrderHistoryStore::new(pool.clone())),
            health: Arc::new(PgHealth { pool }),
        }
    }

    /// Process-local stores sharing one [`MemoryStore`].
    #[must_use]
    pub fn memory() -> Self {
        Self::from_memory(&Arc::new(MemoryStore::new()))
    }

    /// Wrap an existing [`MemoryStore`] so callers can inspect it afterwards.
    #[must_use]
    pub fn from_memory(store: &Arc<MemoryStore>) -> Self {
        Self {
            carts: store.clone(),
            wishlist: store.clone(),
            addresses: store.clone(),
            orders: store.clone(),
            health: store.clone(),
        }
    }
}

struct PgHealth {
    pool: PgPool,
}

#[async_trait]
impl StorageHealth for PgHealth {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Parse an owner column, reporting bad rows as corruption.
fn owner_from_row(raw: &str) -> Result<UserId, RepositoryError> {
    UserId::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid uid in database: {e}")))
}
