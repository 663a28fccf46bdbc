//! Address book ("info-account") route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use shoply_core::{AddressId, UserId};

use super::MessageResponse;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Address, AddressFields};
use crate::services::AddressService;
use crate::state::AppState;

/// Body of `POST /api/info-account`.
#[derive(Debug, Deserialize)]
pub struct CreateAddressRequest {
    pub uid: UserId,
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// Body of `PUT /api/info-account/{id}`. The `uid`, if sent, must be the caller.
#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    #[serde(default)]
    pub uid: Option<UserId>,
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// `POST /api/info-account`
#[instrument(skip(state, identity, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    body: std::result::Result<Json<CreateAddressRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Address>)> {
    let Json(request) = body?;
    let address = AddressService::new(state.addresses())
        .create(&identity, &request.uid, request.fields)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// `GET /api/info-account/{uid}`
#[instrument(skip(state, identity))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(uid): Path<String>,
) -> Result<Json<Vec<Address>>> {
    let owner = UserId::parse(&uid)?;
    let addresses = AddressService::new(state.addresses())
        .list(&identity, &owner)
        .await?;
    Ok(Json(addresses))
}

/// `PUT /api/info-account/{id}`
#[instrument(skip(state, identity, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateAddressRequest>, JsonRejection>,
) -> Result<Json<Address>> {
    let id = AddressId::parse(&id)?;
    let Json(request) = body?;

    let address = AddressService::new(state.addresses())
        .update(&identity, id, request.uid.as_ref(), &request.fields)
        .await?;
    Ok(Json(address))
}

/// `DELETE /api/info-account/{id}`
#[instrument(skip(state, identity))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = AddressId::parse(&id)?;
    AddressService::new(state.addresses())
        .delete(&identity, id)
        .await?;
    Ok(Json(MessageResponse::new("Item removed from InfoAccountList")))
}
