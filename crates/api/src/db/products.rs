//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use foodcart_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// A product row joined with its category name, restricted to products some
/// restaurant currently stocks.
#[derive(Debug, Clone, FromRow)]
pub struct AvailableProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub special_status: bool,
    pub ingredients: String,
    pub image: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products stocked by at least one restaurant (an available menu item
    /// exists), with category data for the listing endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available(&self) -> Result<Vec<AvailableProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, AvailableProduct>(
            r"
            SELECT DISTINCT p.id, p.name, p.price, p.special_status, p.ingredients, p.image,
                   c.id AS category_id, c.name AS category_name
            FROM products p
            LEFT JOIN product_categories c ON c.id = p.category_id
            JOIN menu_items m ON m.product_id = p.id AND m.availability
            ORDER BY p.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetch the products with the given ids (missing ids are simply absent
    /// from the result; the caller decides whether that is an error).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, category_id, price, image, special_status, ingredients
            FROM products
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
