//! Order repository for database operations.
//!
//! Order creation is all-or-nothing: the order row and every item row are
//! inserted in one transaction, so a failing line item can never leave a
//! partially populated order behind.

use chrono::Utc;
use sqlx::PgPool;

use foodcart_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with all of its items in a single transaction.
    ///
    /// Each item's unit price is snapshotted from the product row inside the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an item references a product
    /// that does not exist or has a non-positive quantity.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        if new_order.products.is_empty() {
            return Err(RepositoryError::Conflict(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(item) = new_order.products.iter().find(|item| item.quantity <= 0) {
            return Err(RepositoryError::Conflict(format!(
                "non-positive quantity for product {}",
                item.product
            )));
        }

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders
                (firstname, lastname, phonenumber, address, status, payment_method,
                 comment, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, firstname, lastname, phonenumber, address, status,
                      payment_method, comment, registered_at, called_at, delivered_at
            ",
        )
        .bind(&new_order.firstname)
        .bind(&new_order.lastname)
        .bind(&new_order.phonenumber)
        .bind(&new_order.address)
        .bind(OrderStatus::Unprocessed)
        .bind(new_order.payment_method)
        .bind(&new_order.comment)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.products {
            // Snapshots the current product price; zero rows means the
            // product does not exist and the whole transaction rolls back.
            let inserted = sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                SELECT $1, p.id, $2, p.price
                FROM products p
                WHERE p.id = $3
                ",
            )
            .bind(order.id)
            .bind(item.quantity)
            .bind(item.product)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() == 0 {
                return Err(RepositoryError::Conflict(format!(
                    "unknown product: {}",
                    item.product
                )));
            }
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, Order>(
            r"
            SELECT id, firstname, lastname, phonenumber, address, status,
                   payment_method, comment, registered_at, called_at, delivered_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Items of an order, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Orders still awaiting processing, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_unprocessed(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, Order>(
            r"
            SELECT id, firstname, lastname, phonenumber, address, status,
                   payment_method, comment, registered_at, called_at, delivered_at
            FROM orders
            WHERE status = 'unprocessed'
            ORDER BY registered_at
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Move an order to `processed`.
    ///
    /// The transition is one-way and idempotent: the guard sits in the WHERE
    /// clause, so concurrent updates cannot revert an already processed
    /// order, and re-processing one is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn mark_processed(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let updated = sqlx::query_as::<_, Order>(
            r"
            UPDATE orders
            SET status = 'processed'
            WHERE id = $1 AND status = 'unprocessed'
            RETURNING id, firstname, lastname, phonenumber, address, status,
                      payment_method, comment, registered_at, called_at, delivered_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(order) => Ok(order),
            // Already processed (idempotent) or genuinely missing.
            None => self.get(id).await?.ok_or(RepositoryError::NotFound),
        }
    }
}
