//! `PostgreSQL` cart store.
//!
//! Line items live in a JSONB column so the whole cart is read and written
//! as one document. The unique index on `uid` makes `save` an upsert keyed by
//! owner, which is what keeps carts one-per-user.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use shoply_core::{Cart, CartId, CartItem, UserId};

use super::{CartStore, RepositoryError, owner_from_row};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    uid: String,
    items: Json<Vec<CartItem>>,
}

impl TryFrom<CartRow> for Cart {
    type Error = RepositoryError;

    fn try_from(row: CartRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            owner: owner_from_row(&row.uid)?,
            items: row.items.0,
        })
    }
}

/// Cart store backed by `storefront.cart`.
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a new cart store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, uid, items
            FROM storefront.cart
            WHERE uid = $1
            ",
        )
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cart::try_from).transpose()
    }

    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, uid, items
            FROM storefront.cart
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cart::try_from).transpose()
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO storefront.cart (id, uid, items)
            VALUES ($1, $2, $3)
            ON CONFLICT (uid) DO UPDATE
            SET items = EXCLUDED.items, updated_at = now()
            RETURNING id, uid, items
            ",
        )
        .bind(cart.id)
        .bind(cart.owner.as_str())
        .bind(Json(&cart.items))
        .fetch_one(&self.pool)
        .await?;

        Cart::try_from(row)
    }

    async fn delete_by_id(&self, id: CartId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.cart WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_items(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            UPDATE storefront.cart
            SET items = '[]'::jsonb, updated_at = now()
            WHERE id = $1
            RETURNING id, uid, items
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cart::try_from).transpose()
    }
}
