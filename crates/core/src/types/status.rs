//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Order processing status.
///
/// The transition is one-way: an order starts `unprocessed` and moves to
/// `processed` once a manager has handled it. There are no further states
/// and no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Unprocessed,
    Processed,
}

impl OrderStatus {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Staying in place is allowed (idempotent updates); reverting is not.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Unprocessed, _) | (Self::Processed, Self::Processed) => true,
            (Self::Processed, Self::Unprocessed) => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unprocessed => write!(f, "unprocessed"),
            Self::Processed => write!(f, "processed"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unprocessed" => Ok(Self::Unprocessed),
            "processed" => Ok(Self::Processed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Online,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Online => write!(f, "online"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "online" => Ok(Self::Online),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        assert!(OrderStatus::Unprocessed.can_transition_to(OrderStatus::Processed));
        assert!(OrderStatus::Unprocessed.can_transition_to(OrderStatus::Unprocessed));
        assert!(OrderStatus::Processed.can_transition_to(OrderStatus::Processed));
        assert!(!OrderStatus::Processed.can_transition_to(OrderStatus::Unprocessed));
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Unprocessed).expect("serialize"),
            "\"unprocessed\""
        );
        let status: OrderStatus = serde_json::from_str("\"processed\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Processed);
    }

    #[test]
    fn test_payment_method_round_trip() {
        let method: PaymentMethod = "online".parse().expect("parse");
        assert_eq!(method, PaymentMethod::Online);
        assert_eq!(method.to_string(), "online");
        assert!("card".parse::<PaymentMethod>().is_err());
    }
}
