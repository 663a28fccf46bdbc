//! `PostgreSQL` wishlist store.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use shoply_core::{Price, UserId, WishlistItemId};

use super::{RepositoryError, WishlistStore, owner_from_row};
use crate::models::WishlistItem;

#[derive(sqlx::FromRow)]
struct WishlistRow {
    id: WishlistItemId,
    uid: String,
    title: String,
    image: String,
    price: Decimal,
    pathname: String,
}

impl TryFrom<WishlistRow> for WishlistItem {
    type Error = RepositoryError;

    fn try_from(row: WishlistRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            owner: owner_from_row(&row.uid)?,
            title: row.title,
            image: row.image,
            price,
            pathname: row.pathname,
        })
    }
}

/// Wishlist store backed by `storefront.wishlist_item`.
pub struct PgWishlistStore {
    pool: PgPool,
}

impl PgWishlistStore {
    /// Create a new wishlist store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistStore for PgWishlistStore {
    async fn insert(&self, item: &WishlistItem) -> Result<WishlistItem, RepositoryError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            r"
            INSERT INTO storefront.wishlist_item (id, uid, title, image, price, pathname)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, uid, title, image, price, pathname
            ",
        )
        .bind(item.id)
        .bind(item.owner.as_str())
        .bind(&item.title)
        .bind(&item.image)
        .bind(item.price.amount())
        .bind(&item.pathname)
        .fetch_one(&self.pool)
        .await?;

        WishlistItem::try_from(row)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<WishlistItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistRow>(
            r"
            SELECT id, uid, title, image, price, pathname
            FROM storefront.wishlist_item
            WHERE uid = $1
            ORDER BY created_at
            ",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WishlistItem::try_from).collect()
    }

    async fn find_by_id(
        &self,
        id: WishlistItemId,
    ) -> Result<Option<WishlistItem>, RepositoryError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            r"
            SELECT id, uid, title, image, price, pathname
            FROM storefront.wishlist_item
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WishlistItem::try_from).transpose()
    }

    async fn delete_by_id(&self, id: WishlistItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.wishlist_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
