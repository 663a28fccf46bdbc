//! Shoply Core - Shared types and cart document logic.
//!
//! This crate provides the pieces every Shoply component agrees on:
//! - `storefront` - The authenticated HTTP API
//! - `cli` - Command-line tools for migrations and dev tokens
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Cart mutations are expressed as methods on an
//! in-memory [`Cart`] so they can be tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, user IDs, prices, and quantities
//! - [`cart`] - The cart document and its merge/increase/decrease rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartItem, Decrease, NewCartItem};
pub use types::*;
