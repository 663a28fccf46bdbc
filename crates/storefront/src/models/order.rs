//! Checkout order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoply_core::{OrderHistoryId, OrderId, Price, Quantity, UserId};

/// A purchased line as submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    pub title: String,
    pub image: String,
    pub price: Price,
    pub color: String,
    pub quantity: Quantity,
    #[serde(rename = "webID")]
    pub web_id: i64,
}

/// A recorded order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub title: String,
    pub image: String,
    pub price: Price,
    pub color: String,
    pub quantity: Quantity,
    #[serde(rename = "webID")]
    pub web_id: i64,
    pub placed_at: DateTime<Utc>,
}

/// One shopper's order history. Orders are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistory {
    pub id: OrderHistoryId,
    #[serde(rename = "uid")]
    pub owner: UserId,
    pub orders: Vec<Order>,
}

impl OrderHistory {
    /// An empty, not-yet-persisted history.
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self {
            id: OrderHistoryId::generate(),
            owner,
            orders: Vec::new(),
        }
    }

    /// Append submitted lines, stamping each with an id and `placed_at`.
    pub fn append(&mut self, lines: Vec<NewOrder>, placed_at: DateTime<Utc>) {
        self.orders.extend(lines.into_iter().map(|line| Order {
            id: OrderId::generate(),
            title: line.title,
            image: line.image,
            price: line.price,
            color: line.color,
            quantity: line.quantity,
            web_id: line.web_id,
            placed_at,
        }));
    }
}
