//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Bearer token issue/verify and identity provider exchange
//! - `ownership` - The ownership check every per-user operation passes
//! - `cart` - Cart mutations (add/merge, increase, decrease, remove, clear)
//! - `wishlist` - Saved products
//! - `addresses` - Address book
//! - `checkout` - Order history
//!
//! Services borrow their stores from `AppState` for the duration of one
//! request and return `AppError` directly.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod ownership;
pub mod wishlist;

pub use addresses::AddressService;
pub use cart::CartService;
pub use checkout::CheckoutService;
pub use wishlist::WishlistService;
