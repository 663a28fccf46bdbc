//! Address book entries (shipping and billing).

use serde::{Deserialize, Serialize};

use shoply_core::{AddressId, UserId};

/// The editable part of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    #[serde(default)]
    pub company: Option<String>,
    pub street: String,
    /// Apartment, suite, unit.
    #[serde(default)]
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    /// Contact phone number.
    pub number: String,
    pub postal_code: String,
    /// Delivery instructions.
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub shipping: bool,
    #[serde(default)]
    pub billing: bool,
}

/// A stored address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(rename = "uid")]
    pub owner: UserId,
    #[serde(flatten)]
    pub fields: AddressFields,
}

impl Address {
    /// Assign an identifier and owner to new address fields.
    #[must_use]
    pub fn new(owner: UserId, fields: AddressFields) -> Self {
        Self {
            id: AddressId::generate(),
            owner,
            fields,
        }
    }
}
