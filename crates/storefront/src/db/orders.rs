//! `PostgreSQL` order history store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use shoply_core::{OrderHistoryId, UserId};

use super::{OrderHistoryStore, RepositoryError, owner_from_row};
use crate::models::{Order, OrderHistory};

#[derive(sqlx::FromRow)]
struct OrderHistoryRow {
    id: OrderHistoryId,
    uid: String,
    orders: Json<Vec<Order>>,
}

impl TryFrom<OrderHistoryRow> for OrderHistory {
    type Error = RepositoryError;

    fn try_from(row: OrderHistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            owner: owner_from_row(&row.uid)?,
            orders: row.orders.0,
        })
    }
}

/// Order history store backed by `storefront.order_history`.
pub struct PgOrderHistoryStore {
    pool: PgPool,
}

impl PgOrderHistoryStore {
    /// Create a new order history store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderHistoryStore for PgOrderHistoryStore {
    async fn find_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Option<OrderHistory>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderHistoryRow>(
            "SELECT id, uid, orders FROM storefront.order_history WHERE uid = $1",
        )
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderHistory::try_from).transpose()
    }

    async fn save(&self, history: &OrderHistory) -> Result<OrderHistory, RepositoryError> {
        let row = sqlx::query_as::<_, OrderHistoryRow>(
            r"
            INSERT INTO storefront.order_history (id, uid, orders)
            VALUES ($1, $2, $3)
            ON CONFLICT (uid) DO UPDATE
            SET orders = EXCLUDED.orders, updated_at = now()
            RETURNING id, uid, orders
            ",
        )
        .bind(history.id)
        .bind(history.owner.as_str())
        .bind(Json(&history.orders))
        .fetch_one(&self.pool)
        .await?;

        OrderHistory::try_from(row)
    }
}
