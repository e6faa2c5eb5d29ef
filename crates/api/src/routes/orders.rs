//! Order registration and management.

use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

use foodcart_core::{OrderId, OrderStatus, ProductId};

use crate::db::{OrderRepository, ProductRepository, RestaurantRepository};
use crate::error::{AppError, Result};
use crate::matcher::RankedRestaurant;
use crate::models::{NewOrder, Order};
use crate::state::AppState;

/// `POST /api/order` - register a new order with its items.
///
/// Creation is all-or-nothing: if any line item fails validation the whole
/// order is rejected and nothing is persisted.
pub async fn register(
    State(state): State<AppState>,
    Json(new_order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    if new_order.products.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }
    if new_order.products.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest(
            "item quantities must be positive".to_string(),
        ));
    }

    let wanted: Vec<ProductId> = new_order.products.iter().map(|item| item.product).collect();
    let known: HashSet<ProductId> = ProductRepository::new(state.pool())
        .get_by_ids(&wanted)
        .await?
        .into_iter()
        .map(|product| product.id)
        .collect();

    if let Some(missing) = wanted.iter().find(|id| !known.contains(id)) {
        return Err(AppError::BadRequest(format!("unknown product: {missing}")));
    }

    let order = OrderRepository::new(state.pool()).create(&new_order).await?;
    info!(order_id = %order.id, items = new_order.products.len(), "Order registered");

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders` - orders awaiting processing, oldest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_unprocessed().await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}/restaurants` - restaurants able to fulfill the
/// entire order, ranked by distance from the delivery address.
///
/// An empty list means no restaurant stocks every ordered product; a
/// geocoding failure is an error, not an empty list.
pub async fn restaurants(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Vec<RankedRestaurant>>> {
    let order_repo = OrderRepository::new(state.pool());
    let order = order_repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let wanted: HashSet<ProductId> = order_repo
        .items(id)
        .await?
        .into_iter()
        .map(|item| item.product_id)
        .collect();

    let restaurant_repo = RestaurantRepository::new(state.pool());
    let wanted_list: Vec<ProductId> = wanted.iter().copied().collect();
    let listings = restaurant_repo.available_listings(&wanted_list).await?;
    let candidates = restaurant_repo.list().await?;

    let ranked = state
        .matcher()
        .rank(order.id, &order.address, &wanted, &listings, &candidates)
        .await?;

    Ok(Json(ranked))
}

/// Requested status change for an order.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// `POST /api/orders/{id}/status` - move an order through its one-way
/// status transition. Reverting a processed order is rejected.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.can_transition_to(update.status) {
        return Err(AppError::BadRequest(format!(
            "cannot move order from {} to {}",
            order.status, update.status
        )));
    }

    let order = match update.status {
        OrderStatus::Processed => repo.mark_processed(id).await?,
        OrderStatus::Unprocessed => order,
    };

    Ok(Json(order))
}
