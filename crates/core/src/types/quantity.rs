//! Line item quantity.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one; a zero quantity line is removed instead.
    #[error("quantity must be at least 1")]
    Zero,
    /// The quantity is below zero.
    #[error("quantity cannot be negative (got {0})")]
    Negative(i64),
    /// The quantity does not fit the storage type.
    #[error("quantity is too large (got {0})")]
    Overflow(i64),
}

/// A strictly positive line item quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Zero` for zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    /// Interpret a client-supplied quantity for an add operation.
    ///
    /// A missing or zero quantity means one. Negative values are rejected.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Negative` or `QuantityError::Overflow`.
    pub fn from_requested(requested: Option<i64>) -> Result<Self, QuantityError> {
        match requested {
            None | Some(0) => Ok(Self::ONE),
            Some(n) if n < 0 => Err(QuantityError::Negative(n)),
            Some(n) => u32::try_from(n)
                .map(Self)
                .map_err(|_| QuantityError::Overflow(n)),
        }
    }

    /// Get the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add another quantity, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract one. Returns `None` when the quantity would reach zero.
    #[must_use]
    pub const fn decremented(self) -> Option<Self> {
        if self.0 > 1 { Some(Self(self.0 - 1)) } else { None }
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
