//! The cart document and its mutation rules.
//!
//! A [`Cart`] is the single document that holds one shopper's line items.
//! Everything here is pure: callers load a cart, apply one mutation, and
//! persist the whole document again.
//!
//! # Invariants
//!
//! - No two items share a merge key (`webID` + `color`).
//! - Every stored item has a quantity of at least one. Decreasing a line
//!   with quantity one removes the line.
//!
//! Lookups are linear scans over `items`, so each mutation costs O(items).
//! Carts are small enough that no secondary index is kept.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CartId, CartItemId, Price, Quantity, UserId};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line in the cart carries the requested identifier.
    #[error("item {0} not found in cart")]
    ItemNotFound(CartItemId),
}

/// The identity of a line for merge purposes: `(webID, color)`.
pub(crate) type MergeKey<'a> = (i64, &'a str);

/// A line item as supplied by the shopper, before it has an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub title: String,
    pub image: String,
    pub price: Price,
    pub color: String,
    pub quantity: Quantity,
    pub web_id: i64,
}

impl NewCartItem {
    /// The merge key of this line.
    #[must_use]
    pub(crate) fn merge_key(&self) -> MergeKey<'_> {
        (self.web_id, self.color.as_str())
    }
}

/// A stored cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub title: String,
    pub image: String,
    pub price: Price,
    pub color: String,
    pub quantity: Quantity,
    #[serde(rename = "webID")]
    pub web_id: i64,
}

impl CartItem {
    /// The merge key of this line.
    #[must_use]
    pub(crate) fn merge_key(&self) -> MergeKey<'_> {
        (self.web_id, self.color.as_str())
    }
}

/// What a decrease did to the targeted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrease {
    /// The line is still present with this quantity.
    Decremented(Quantity),
    /// The line had quantity one and was removed.
    Removed,
}

/// One shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(rename = "uid")]
    pub owner: UserId,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// A fresh, empty, not-yet-persisted cart for `owner`.
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self {
            id: CartId::generate(),
            owner,
            items: Vec::new(),
        }
    }

    /// Add a line, merging into an existing line with the same merge key.
    ///
    /// Adding is cumulative, never a "set": the same input applied twice
    /// doubles the added quantity. Returns the identifier of the line that
    /// now holds the quantity.
    pub fn add_item(&mut self, item: NewCartItem) -> CartItemId {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|existing| existing.merge_key() == item.merge_key())
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return existing.id;
        }

        let id = CartItemId::generate();
        self.items.push(CartItem {
            id,
            title: item.title,
            image: item.image,
            price: item.price,
            color: item.color,
            quantity: item.quantity,
            web_id: item.web_id,
        });
        id
    }

    /// Find a line by identifier.
    #[must_use]
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Increase a line's quantity by one. There is no upper bound.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if no line has this identifier.
    pub fn increase(&mut self, id: CartItemId) -> Result<Quantity, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CartError::ItemNotFound(id))?;

        item.quantity = item.quantity.saturating_add(Quantity::ONE);
        Ok(item.quantity)
    }

    /// Decrease a line's quantity by one, removing the line at quantity one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if no line has this identifier.
    pub fn decrease(&mut self, id: CartItemId) -> Result<Decrease, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CartError::ItemNotFound(id))?;

        let remaining = self.items.get(index).and_then(|item| item.quantity.decremented());

        match remaining {
            Some(quantity) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = quantity;
                }
                Ok(Decrease::Decremented(quantity))
            }
            None => {
                self.items.remove(index);
                Ok(Decrease::Removed)
            }
        }
    }

    /// Remove a line by identifier, regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if no line has this identifier.
    pub fn remove_item(&mut self, id: CartItemId) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CartError::ItemNotFound(id))?;

        Ok(self.items.remove(index))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn owner() -> UserId {
        UserId::parse("test-user-id").unwrap()
    }

    fn line(web_id: i64, color: &str, quantity: u32) -> NewCartItem {
        NewCartItem {
            title: "Test Product".to_string(),
            image: "test-image.jpg".to_string(),
            price: Price::new(Decimal::from_str("29.99").unwrap()).unwrap(),
            color: color.to_string(),
            quantity: Quantity::new(quantity).unwrap(),
            web_id,
        }
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new(owner());
        assert!(cart.is_empty());
        assert_eq!(cart.owner, owner());
    }

    #[test]
    fn test_add_same_key_merges_quantities() {
        let mut cart = Cart::new(owner());
        for q in [1, 2, 4] {
            cart.add_item(line(12345, "Red", q));
        }
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity.get(), 7);
    }

    #[test]
    fn test_add_keeps_first_line_identity_on_merge() {
        let mut cart = Cart::new(owner());
        let first_id = cart.add_item(line(1, "Red", 1));
        let merged_id = cart.add_item(line(1, "Red", 1));
        assert_eq!(first_id, merged_id);
    }

    #[test]
    fn test_add_different_color_appends() {
        let mut cart = Cart::new(owner());
        cart.add_item(line(12345, "Red", 1));
        cart.add_item(line(12345, "Blue", 1));
        cart.add_item(line(999, "Red", 1));
        assert_eq!(cart.items.len(), 3);
        assert_eq!(cart.items[1].color, "Blue");
        assert_eq!(cart.items[2].web_id, 999);
    }

    #[test]
    fn test_color_match_is_case_sensitive() {
        let mut cart = Cart::new(owner());
        cart.add_item(line(1, "Red", 1));
        cart.add_item(line(1, "red", 1));
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn test_increase_then_decrease_restores_quantity() {
        let mut cart = Cart::new(owner());
        let id = cart.add_item(line(1, "Red", 3));
        assert_eq!(cart.increase(id).unwrap().get(), 4);
        assert_eq!(
            cart.decrease(id).unwrap(),
            Decrease::Decremented(Quantity::new(3).unwrap())
        );
        assert_eq!(cart.item(id).unwrap().quantity.get(), 3);
    }

    #[test]
    fn test_decrease_at_one_removes_line() {
        let mut cart = Cart::new(owner());
        cart.add_item(line(1, "Red", 5));
        let id = cart.add_item(line(2, "Red", 1));
        let before = cart.items.len();

        assert_eq!(cart.decrease(id).unwrap(), Decrease::Removed);
        assert_eq!(cart.items.len(), before - 1);
        assert!(cart.item(id).is_none());
        assert!(cart.items.iter().all(|item| item.quantity.get() >= 1));
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let mut cart = Cart::new(owner());
        cart.add_item(line(1, "Red", 1));
        let missing = CartItemId::generate();

        assert_eq!(cart.increase(missing), Err(CartError::ItemNotFound(missing)));
        assert_eq!(cart.decrease(missing), Err(CartError::ItemNotFound(missing)));
        assert_eq!(
            cart.remove_item(missing),
            Err(CartError::ItemNotFound(missing))
        );
        assert_eq!(cart.items[0].quantity.get(), 1);
    }

    #[test]
    fn test_remove_by_id_ignores_quantity() {
        let mut cart = Cart::new(owner());
        let id = cart.add_item(line(1, "Red", 9));
        let removed = cart.remove_item(id).unwrap();
        assert_eq!(removed.quantity.get(), 9);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_full_lifecycle_scenario() {
        let mut cart = Cart::new(owner());

        cart.add_item(line(12345, "Red", 1));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity.get(), 1);

        let id = cart.add_item(line(12345, "Red", 1));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity.get(), 2);

        cart.increase(id).unwrap();
        assert_eq!(cart.items[0].quantity.get(), 3);

        cart.decrease(id).unwrap();
        cart.decrease(id).unwrap();
        assert_eq!(cart.items[0].quantity.get(), 1);

        assert_eq!(cart.decrease(id).unwrap(), Decrease::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_keeps_identity() {
        let mut cart = Cart::new(owner());
        let cart_id = cart.id;
        cart.add_item(line(1, "Red", 1));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.id, cart_id);
    }

    #[test]
    fn test_merge_key_is_web_id_and_color_only() {
        let mut first = line(7, "Red", 1);
        let mut second = line(7, "Red", 3);
        second.title = "Other Title".to_string();
        second.image = "other.jpg".to_string();
        assert_eq!(first.merge_key(), second.merge_key());

        first.color = "Blue".to_string();
        assert_ne!(first.merge_key(), second.merge_key());
    }

    #[test]
    fn test_wire_format() {
        let mut cart = Cart::new(owner());
        cart.add_item(line(12345, "Red", 1));
        let json = serde_json::to_value(&cart).unwrap();

        assert_eq!(json["uid"], "test-user-id");
        assert_eq!(json["items"][0]["webID"], 12345);
        assert_eq!(json["items"][0]["quantity"], 1);
        assert_eq!(json["items"][0]["price"], "29.99");
    }

    #[test]
    fn test_stored_zero_quantity_is_rejected() {
        let json = serde_json::json!({
            "id": CartId::generate(),
            "uid": "u",
            "items": [{
                "id": CartItemId::generate(),
                "title": "t", "image": "i", "price": "1.00",
                "color": "Red", "quantity": 0, "webID": 1
            }]
        });
        assert!(serde_json::from_value::<Cart>(json).is_err());
    }
}
