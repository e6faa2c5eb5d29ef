//! Restaurant and menu repository for database operations.

use sqlx::PgPool;

use foodcart_core::ProductId;

use super::RepositoryError;
use crate::matcher::MenuListing;
use crate::models::{MenuItem, Restaurant};

/// Repository for restaurant database operations.
pub struct RestaurantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RestaurantRepository<'a> {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All restaurants, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let rows = sqlx::query_as::<_, Restaurant>(
            r"
            SELECT id, name, address, contact_phone
            FROM restaurants
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Available menu listings for the given products, as matcher input.
    ///
    /// Only rows with `availability = true` count as stocking a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn available_listings(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<MenuListing>, RepositoryError> {
        let raw_ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, MenuItem>(
            r"
            SELECT id, restaurant_id, product_id, availability
            FROM menu_items
            WHERE availability AND product_id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|item| MenuListing {
                restaurant_id: item.restaurant_id,
                product_id: item.product_id,
            })
            .collect())
    }
}
