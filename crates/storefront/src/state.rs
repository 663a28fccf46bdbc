//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::{
    AddressStore, CartStore, OrderHistoryStore, StorageHealth, Stores, WishlistStore,
};
use crate::services::auth::{IdentityProvider, TokenService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the document stores, the token service and the identity provider.
/// Everything is constructed once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stores: Stores,
    tokens: TokenService,
    identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `stores` - Document stores (`PostgreSQL` or in-memory)
    /// * `identity_provider` - Verifier for login-time provider tokens
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        stores: Stores,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let tokens = TokenService::from_config(&config.auth);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                tokens,
                identity_provider,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the cart store.
    #[must_use]
    pub fn carts(&self) -> &dyn CartStore {
        self.inner.stores.carts.as_ref()
    }

    /// Get the wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> &dyn WishlistStore {
        self.inner.stores.wishlist.as_ref()
    }

    /// Get the address store.
    #[must_use]
    pub fn addresses(&self) -> &dyn AddressStore {
        self.inner.stores.addresses.as_ref()
    }

    /// Get the order history store.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderHistoryStore {
        self.inner.stores.orders.as_ref()
    }

    /// Get the storage health probe.
    #[must_use]
    pub fn storage_health(&self) -> &dyn StorageHealth {
        self.inner.stores.health.as_ref()
    }

    /// Get the bearer token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.inner.identity_provider.as_ref()
    }
}
