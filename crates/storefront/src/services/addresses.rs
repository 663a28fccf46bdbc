//! Address book service.

use tracing::instrument;

use shoply_core::{AddressId, UserId};

use crate::db::AddressStore;
use crate::error::{AppError, Result};
use crate::models::{Address, AddressFields, AuthenticatedIdentity};
use crate::services::ownership::ensure_owner;

const RESOURCE: &str = "addresses";

/// Address book operations on behalf of an authenticated caller.
pub struct AddressService<'a> {
    addresses: &'a dyn AddressStore,
}

impl<'a> AddressService<'a> {
    #[must_use]
    pub const fn new(addresses: &'a dyn AddressStore) -> Self {
        Self { addresses }
    }

    /// Add an address to the caller's address book.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner.
    #[instrument(skip(self, identity, details), fields(uid = %owner))]
    pub async fn create(
        &self,
        identity: &AuthenticatedIdentity,
        owner: &UserId,
        details: AddressFields,
    ) -> Result<Address> {
        ensure_owner(identity, owner, RESOURCE)?;
        let address = Address::new(owner.clone(), details);
        Ok(self.addresses.insert(&address).await?)
    }

    /// List the caller's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for a foreign owner.
    #[instrument(skip(self, identity), fields(uid = %owner))]
    pub async fn list(&self, identity: &AuthenticatedIdentity, owner: &UserId) -> Result<Vec<Address>> {
        ensure_owner(identity, owner, RESOURCE)?;
        Ok(self.addresses.list_by_owner(owner).await?)
    }

    /// Replace the editable fields of one address.
    ///
    /// `claimed_owner` is the `uid` sent in the request body, if any. It must
    /// match the caller; the stored owner is never changed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` or `AppError::Forbidden`.
    #[instrument(skip(self, identity, claimed_owner, details), fields(address_id = %id))]
    pub async fn update(
        &self,
        identity: &AuthenticatedIdentity,
        id: AddressId,
        claimed_owner: Option<&UserId>,
        details: &AddressFields,
    ) -> Result<Address> {
        if let Some(claimed) = claimed_owner {
            ensure_owner(identity, claimed, RESOURCE)?;
        }

        let existing = self.load(id).await?;
        ensure_owner(identity, &existing.owner, RESOURCE)?;

        self.addresses
            .update(id, details)
            .await?
            .ok_or_else(address_not_found)
    }

    /// Delete one address, after checking it belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` or `AppError::Forbidden`.
    #[instrument(skip(self, identity), fields(address_id = %id))]
    pub async fn delete(&self, identity: &AuthenticatedIdentity, id: AddressId) -> Result<()> {
        let existing = self.load(id).await?;
        ensure_owner(identity, &existing.owner, RESOURCE)?;

        if !self.addresses.delete_by_id(id).await? {
            return Err(address_not_found());
        }
        Ok(())
    }

    async fn load(&self, id: AddressId) -> Result<Address> {
        self.addresses
            .find_by_id(id)
            .await?
            .ok_or_else(address_not_found)
    }
}

fn address_not_found() -> AppError {
    AppError::NotFound("Item not found".to_string())
}
