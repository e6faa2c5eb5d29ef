//! Restaurants and their menus.

use serde::Serialize;
use sqlx::FromRow;

use foodcart_core::{MenuItemId, ProductId, RestaurantId};

/// A restaurant that can be assigned orders.
///
/// Coordinates are not stored; they are resolved from `address` on demand
/// and cached under the restaurant's id (see [`crate::geo`]).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Postal address as free text, fed to the geocoder verbatim.
    pub address: String,
    pub contact_phone: String,
}

/// A (restaurant, product) association: the restaurant offers the product.
///
/// The pair is unique per restaurant; `availability` toggles whether the
/// restaurant currently stocks the product without deleting the row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub product_id: ProductId,
    pub availability: bool,
}
