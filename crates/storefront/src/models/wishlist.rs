//! Wishlist entries.

use serde::{Deserialize, Serialize};

use shoply_core::{Price, UserId, WishlistItemId};

/// A product the shopper saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    #[serde(rename = "uid")]
    pub owner: UserId,
    pub title: String,
    pub image: String,
    pub price: Price,
    /// Storefront path of the product page.
    pub pathname: String,
}

/// Wishlist entry contents supplied by the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewWishlistItem {
    pub title: String,
    pub image: String,
    pub price: Price,
    pub pathname: String,
}

impl WishlistItem {
    /// Assign an identifier and owner to a new entry.
    #[must_use]
    pub fn new(owner: UserId, item: NewWishlistItem) -> Self {
        Self {
            id: WishlistItemId::generate(),
            owner,
            title: item.title,
            image: item.image,
            price: item.price,
            pathname: item.pathname,
        }
    }
}
