//! Product listing.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::Serialize;

use foodcart_core::{CategoryId, ProductId};

use crate::db::ProductRepository;
use crate::db::products::AvailableProduct;
use crate::error::Result;
use crate::state::AppState;

/// A product as exposed by the listing endpoint.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub special_status: bool,
    pub ingredients: String,
    pub category: Option<CategoryResponse>,
    pub image: String,
}

/// Nested category data for a product.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
}

impl From<AvailableProduct> for ProductResponse {
    fn from(row: AvailableProduct) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategoryResponse { id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            special_status: row.special_status,
            ingredients: row.ingredients,
            category,
            image: row.image,
        }
    }
}

/// `GET /api/products` - products currently stocked by at least one restaurant.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new(state.pool()).list_available().await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_response_nests_category() {
        let row = AvailableProduct {
            id: ProductId::new(1),
            name: "Classic burger".to_string(),
            price: "250.00".parse().expect("decimal"),
            special_status: false,
            ingredients: "beef, bun, pickles".to_string(),
            image: "/media/burger.jpg".to_string(),
            category_id: Some(CategoryId::new(2)),
            category_name: Some("Burgers".to_string()),
        };

        let response = ProductResponse::from(row);
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["category"]["name"], "Burgers");
        assert_eq!(json["category"]["id"], 2);
    }

    #[test]
    fn test_product_response_without_category() {
        let row = AvailableProduct {
            id: ProductId::new(1),
            name: "Water".to_string(),
            price: "50.00".parse().expect("decimal"),
            special_status: false,
            ingredients: String::new(),
            image: "/media/water.jpg".to_string(),
            category_id: None,
            category_name: None,
        };

        let json = serde_json::to_value(ProductResponse::from(row)).expect("serialize");
        assert!(json["category"].is_null());
    }
}
