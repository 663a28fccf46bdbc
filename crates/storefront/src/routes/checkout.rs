//! Checkout order history route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shoply_core::UserId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{NewOrder, OrderHistory};
use crate::services::CheckoutService;
use crate::state::AppState;

/// Body of `POST /api/check-out`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub uid: UserId,
    pub orders: Vec<NewOrder>,
}

/// Response of `POST /api/check-out`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub check_out: OrderHistory,
}

/// `POST /api/check-out` - append orders to the caller's history.
#[instrument(skip(state, identity, body))]
pub async fn record(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    body: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>> {
    let Json(request) = body?;
    let count = request.orders.len().to_string();

    let history = CheckoutService::new(state.orders())
        .record(&identity, &request.uid, request.orders)
        .await?;

    add_breadcrumb("checkout", "Recorded orders", Some(&[("count", count.as_str())]));
    Ok(Json(CheckoutResponse {
        message: "Order successfully added to your dashboard",
        check_out: history,
    }))
}

/// `GET /api/check-out/{uid}`
#[instrument(skip(state, identity))]
pub async fn get_history(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(uid): Path<String>,
) -> Result<Json<Option<OrderHistory>>> {
    let owner = UserId::parse(&uid)?;
    let history = CheckoutService::new(state.orders())
        .get(&identity, &owner)
        .await?;
    Ok(Json(history))
}
