//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /api/banners                 - Static promo banner list
//! GET  /api/products                - Products stocked by at least one restaurant
//!
//! # Orders
//! POST /api/order                   - Register a new order
//! GET  /api/orders                  - Unprocessed orders (manager view)
//! GET  /api/orders/{id}/restaurants - Qualifying restaurants ranked by distance
//! POST /api/orders/{id}/status      - Move an order to `processed`
//! ```

pub mod banners;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(orders::register))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/restaurants", get(orders::restaurants))
        .route("/orders/{id}/status", post(orders::update_status))
}

/// Create all routes for the API, nested under `/api` by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banners", get(banners::index))
        .route("/products", get(products::index))
        .merge(order_routes())
}
