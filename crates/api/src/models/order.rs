//! Orders and order items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use foodcart_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId};

/// A customer order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    /// Delivery address as free text, fed to the geocoder verbatim.
    pub address: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub comment: String,
    /// Set when the order is registered.
    pub registered_at: DateTime<Utc>,
    /// Set when a manager has called the customer back.
    pub called_at: Option<DateTime<Utc>>,
    /// Set when the courier has delivered the order.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A single line of an order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price snapshot taken at order time. Later product price edits
    /// must not retroactively change historical orders.
    pub price: Decimal,
}

/// Payload for registering a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub comment: String,
    pub products: Vec<NewOrderItem>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewOrderItem {
    pub product: ProductId,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_deserializes_frontend_payload() {
        let json = r#"{
            "firstname": "Ivan",
            "lastname": "Petrov",
            "phonenumber": "+79991234567",
            "address": "Moscow, Tverskaya 1",
            "products": [{"product": 1, "quantity": 2}]
        }"#;

        let order: NewOrder = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.payment_method, PaymentMethod::Cash);
        assert_eq!(order.comment, "");
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].product, ProductId::new(1));
        assert_eq!(order.products[0].quantity, 2);
    }

    #[test]
    fn test_new_order_accepts_payment_method() {
        let json = r#"{
            "firstname": "Anna",
            "lastname": "Ivanova",
            "phonenumber": "+79990000000",
            "address": "Moscow, Arbat 10",
            "payment_method": "online",
            "products": [{"product": 3, "quantity": 1}]
        }"#;

        let order: NewOrder = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.payment_method, PaymentMethod::Online);
    }
}
