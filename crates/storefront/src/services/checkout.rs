//! Checkout order history service.

use chrono::Utc;
use tracing::{info, instrument};

use shoply_core::UserId;

use crate::db::OrderHistoryStore;
use crate::error::Result;
use crate::models::{AuthenticatedIdentity, NewOrder, OrderHistory};
use crate::services::ownership::ensure_owner;

const RESOURCE: &str = "orders";

/// Order history operations on behalf of an authenticated caller.
pub struct CheckoutService<'a> {
    orders: &'a dyn OrderHistoryStore,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(orders: &'a dyn OrderHistoryStore) -> Self {
        Self { orders }
    }

    /// Append submitted orders to the caller's history, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner.
    #[instrument(skip(self, identity, orders), fields(uid = %owner, count = orders.len()))]
    pub async fn record(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        orders: Vec<NewOrder>,
    ) -> Result<OrderHistory> {
        ensure_owner(identity, owner, RESOURCE)?;

        let mut history = self
            .orders
            .find_by_owner(owner)
            .await?
            .unwrap_or_else(|| OrderHistory::new(owner.clone()));

        history.append(orders, Utc::now());
        let saved = self.orders.save(&history).await?;

        info!(total = saved.orders.len(), "orders recorded");
        Ok(saved)
    }

    /// Fetch the caller's order history, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner.
    #[instrument(skip(self, identity), fields(uid = %owner))]
    pub async fn get(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
    ) -> Result<Option<OrderHistory>> {
        ensure_owner(identity, owner, RESOURCE)?;
        Ok(self.orders.find_by_owner(owner).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::db::MemoryStore;

    fn identity(uid: &str) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            user_id: UserId::parse(uid).unwrap(),
            email: String::new(),
            name: None,
            picture: None,
        }
    }

    fn order(title: &str) -> NewOrder {
        serde_json::from_value(serde_json::json!({
            "title": title, "image": "i.jpg", "price": "5.00",
            "color": "Green", "quantity": 1, "webID": 3
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_orders_accumulate_in_one_document() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store);
        let me = identity("me");

        let first = service.record(&me, &me.user_id, vec![order("a")]).await.unwrap();
        let second = service
            .record(&me, &me.user_id, vec![order("b"), order("c")])
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.orders.len(), 3);
    }

    #[tokio::test]
    async fn test_get_is_none_until_first_checkout_and_owner_only() {
        let store = MemoryStore::new();
        let service = CheckoutService::new(&store);
        let me = identity("me");

        assert!(service.get(&me, &me.user_id).await.unwrap().is_none());

        let err = service
            .record(&identity("intruder"), &me.user_id, vec![order("a")])
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(service.get(&me, &me.user_id).await.unwrap().is_none());
    }
}
