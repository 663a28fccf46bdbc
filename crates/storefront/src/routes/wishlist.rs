//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use shoply_core::{Price, UserId, WishlistItemId};

use super::MessageResponse;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{NewWishlistItem, WishlistItem};
use crate::services::WishlistService;
use crate::state::AppState;

/// Body of `POST /api/wishlist`.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub uid: UserId,
    pub title: String,
    pub image: String,
    pub price: Price,
    pub pathname: String,
}

/// `POST /api/wishlist`
#[instrument(skip(state, identity, body))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    body: std::result::Result<Json<AddToWishlistRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WishlistItem>)> {
    let Json(request) = body?;
    let item = NewWishlistItem {
        title: request.title,
        image: request.image,
        price: request.price,
        pathname: request.pathname,
    };

    let saved = WishlistService::new(state.wishlist())
        .add(&identity, &request.uid, item)
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /api/wishlist/{uid}`
#[instrument(skip(state, identity))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(uid): Path<String>,
) -> Result<Json<Vec<WishlistItem>>> {
    let owner = UserId::parse(&uid)?;
    let items = WishlistService::new(state.wishlist())
        .list(&identity, &owner)
        .await?;
    Ok(Json(items))
}

/// `DELETE /api/wishlist/{id}`
#[instrument(skip(state, identity))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = WishlistItemId::parse(&id)?;
    WishlistService::new(state.wishlist())
        .remove(&identity, id)
        .await?;
    Ok(Json(MessageResponse::new("Item removed from wishlist")))
}
