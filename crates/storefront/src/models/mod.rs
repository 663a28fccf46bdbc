//! Domain models for storefront.
//!
//! The cart document lives in `shoply-core`; these are the thinner
//! per-user documents served next to it, plus the identity carried by a
//! verified bearer token.

pub mod address;
pub mod identity;
pub mod order;
pub mod wishlist;

pub use address::{Address, AddressFields};
pub use identity::AuthenticatedIdentity;
pub use order::{NewOrder, Order, OrderHistory};
pub use wishlist::{NewWishlistItem, WishlistItem};
