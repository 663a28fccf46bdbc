//! HTTP routes for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                  - Liveness banner
//! GET    /health                            - Health check
//! GET    /health/ready                      - Storage readiness check
//!
//! # Auth
//! POST   /api/auth/token                    - Exchange a Firebase ID token
//! GET    /api/auth/verify                   - Echo the caller's identity
//!
//! # Cart (all authenticated)
//! POST   /api/cart                          - Add item (merges duplicates)
//! GET    /api/cart/{uid}                    - Get cart, or null
//! PUT    /api/cart/increase/{uid}/{item_id} - Quantity + 1
//! PUT    /api/cart/decrease/{uid}/{item_id} - Quantity - 1, removes at 1
//! DELETE /api/cart/{uid}/{item_id}          - Remove one line
//! DELETE /api/cart/{cart_id}                - Empty the cart
//!
//! # Wishlist (all authenticated)
//! POST   /api/wishlist                      - Save item
//! GET    /api/wishlist/{uid}                - List items
//! DELETE /api/wishlist/{id}                 - Remove item
//!
//! # Address book (all authenticated)
//! POST   /api/info-account                  - Create address
//! GET    /api/info-account/{uid}            - List addresses
//! PUT    /api/info-account/{id}             - Update address
//! DELETE /api/info-account/{id}             - Delete address
//!
//! # Checkout (all authenticated)
//! POST   /api/check-out                     - Record orders
//! GET    /api/check-out/{uid}               - Order history, or null
//! ```
//!
//! Routes that share a position use the same parameter name (`{id}`); each
//! handler parses the segment into the identifier type it expects.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod wishlist;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::from_fn,
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// `{"message": "..."}` success body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(auth::token))
        .route("/verify", get(auth::verify))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::add_item))
        .route("/{id}", get(cart::get_cart).delete(cart::clear_cart))
        .route("/{id}/{item_id}", axum::routing::delete(cart::remove_item))
        .route("/increase/{uid}/{item_id}", put(cart::increase))
        .route("/decrease/{uid}/{item_id}", put(cart::decrease))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(wishlist::add_item))
        .route("/{id}", get(wishlist::list).delete(wishlist::remove_item))
}

/// Create the address book routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new().route("/", post(addresses::create)).route(
        "/{id}",
        get(addresses::list)
            .put(addresses::update)
            .delete(addresses::delete),
    )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::record))
        .route("/{id}", get(checkout::get_history))
}

/// Create all API routes, without state or layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/info-account", address_routes())
        .nest("/api/check-out", checkout_routes())
        .fallback(not_found)
}

/// Build the complete application: routes, state, tracing, request IDs and CORS.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry hub.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    routes()
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy for the configured browser origins.
fn cors_layer(config: &StorefrontConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn root() -> &'static str {
    "App is Working"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storage_health().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            warn!(error = %err, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
