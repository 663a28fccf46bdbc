//! Shoply storefront library.
//!
//! The HTTP API for carts, wishlists, address books and checkout history,
//! exposed as a library so the binary, the CLI and the integration tests
//! share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
