//! Products and categories.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use foodcart_core::{CategoryId, ProductId};

/// A sellable product.
///
/// Categories are a weak grouping; products survive category deletion with
/// `category_id` nulled out.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category_id: Option<CategoryId>,
    /// Current list price. Order items snapshot this at order time.
    pub price: Decimal,
    /// Image reference (URL or static path).
    pub image: String,
    pub special_status: bool,
    pub ingredients: String,
}
