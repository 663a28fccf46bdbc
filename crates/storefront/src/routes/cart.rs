//! Cart route handlers.
//!
//! Every handler authenticates first, so a missing token is reported before
//! any malformed path or body.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::instrument;

use shoply_core::{Cart, CartId, CartItemId, NewCartItem, Price, Quantity, UserId};

use super::MessageResponse;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::CartService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/cart`.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub uid: UserId,
    pub item: CartItemRequest,
}

/// A line item as posted by the client.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub title: String,
    pub image: String,
    pub price: Price,
    pub color: String,
    /// Missing, null or zero means one. Whole floats such as `2.0` are
    /// accepted; fractional values are not.
    #[serde(default)]
    pub quantity: Option<Number>,
    #[serde(rename = "webID")]
    pub web_id: i64,
}

impl TryFrom<CartItemRequest> for NewCartItem {
    type Error = AppError;

    fn try_from(item: CartItemRequest) -> Result<Self> {
        let requested = item.quantity.as_ref().map(whole_number).transpose()?;
        let quantity = Quantity::from_requested(requested)
            .map_err(|e| AppError::BadRequest(format!("Invalid quantity: {e}")))?;

        Ok(Self {
            title: item.title,
            image: item.image,
            price: item.price,
            color: item.color,
            quantity,
            web_id: item.web_id,
        })
    }
}

// i64 bounds as f64; the upper bound itself is out of range
const WHOLE_MIN: f64 = -9_223_372_036_854_775_808.0;
const WHOLE_MAX: f64 = 9_223_372_036_854_775_808.0;

/// Read a JSON number as an integer, accepting floats with no fraction.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(number: &Number) -> Result<i64> {
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }

    number
        .as_f64()
        .filter(|n| n.fract() == 0.0 && (WHOLE_MIN..WHOLE_MAX).contains(n))
        .map(|n| n as i64)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid quantity: {number}")))
}

/// Response of `DELETE /api/cart/{id}`.
#[derive(Debug, Serialize)]
pub struct ClearCartResponse {
    pub message: &'static str,
    pub cart: Cart,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/cart` - add a line, merging with an existing `(webID, color)`.
#[instrument(skip(state, identity, body))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    body: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<Cart>> {
    let Json(request) = body?;
    let item = NewCartItem::try_from(request.item)?;
    let web_id = item.web_id.to_string();

    let cart = CartService::new(state.carts())
        .add_item(&identity, &request.uid, item)
        .await?;

    add_breadcrumb("cart", "Added item to cart", Some(&[("web_id", web_id.as_str())]));
    Ok(Json(cart))
}

/// `GET /api/cart/{uid}` - the caller's cart, or `null` if none exists.
#[instrument(skip(state, identity))]
pub async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(uid): Path<String>,
) -> Result<Json<Option<Cart>>> {
    let owner = UserId::parse(&uid)?;
    let cart = CartService::new(state.carts()).get(&identity, &owner).await?;
    Ok(Json(cart))
}

/// `PUT /api/cart/increase/{uid}/{item_id}`
#[instrument(skip(state, identity))]
pub async fn increase(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path((uid, item_id)): Path<(String, String)>,
) -> Result<Json<Cart>> {
    let owner = UserId::parse(&uid)?;
    let item_id = CartItemId::parse(&item_id)?;

    let cart = CartService::new(state.carts())
        .increase(&identity, &owner, item_id)
        .await?;
    Ok(Json(cart))
}

/// `PUT /api/cart/decrease/{uid}/{item_id}`
#[instrument(skip(state, identity))]
pub async fn decrease(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path((uid, item_id)): Path<(String, String)>,
) -> Result<Json<Cart>> {
    let owner = UserId::parse(&uid)?;
    let item_id = CartItemId::parse(&item_id)?;

    let cart = CartService::new(state.carts())
        .decrease(&identity, &owner, item_id)
        .await?;
    Ok(Json(cart))
}

/// `DELETE /api/cart/{uid}/{item_id}` - remove one line.
#[instrument(skip(state, identity))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path((uid, item_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    let owner = UserId::parse(&uid)?;
    let item_id = CartItemId::parse(&item_id)?;

    CartService::new(state.carts())
        .remove_item(&identity, &owner, item_id)
        .await?;

    add_breadcrumb("cart", "Removed item from cart", None);
    Ok(Json(MessageResponse::new("Item removed successfully")))
}

/// `DELETE /api/cart/{cart_id}` - empty a cart by its own id.
#[instrument(skip(state, identity))]
pub async fn clear_cart(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(cart_id): Path<String>,
) -> Result<Json<ClearCartResponse>> {
    let cart_id = CartId::parse(&cart_id)?;
    let cart = CartService::new(state.carts())
        .clear(&identity, cart_id)
        .await?;

    Ok(Json(ClearCartResponse {
        message: "Cart items cleared",
        cart,
    }))
}
