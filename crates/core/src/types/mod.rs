//! Core value types for Shoply.
//!
//! This module provides type-safe wrappers for identifiers, owners, prices
//! and quantities.

pub mod id;
pub mod price;
pub mod quantity;
pub mod user;

pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use user::{UserId, UserIdError};
