//! Promo banner listing.

use axum::Json;
use serde::Serialize;

/// A promo banner shown on the storefront landing page.
#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub title: &'static str,
    pub src: &'static str,
    pub text: &'static str,
}

/// The banner set is static content, not database rows.
const BANNERS: [Banner; 3] = [
    Banner {
        title: "Burger",
        src: "/static/burger.jpg",
        text: "Tasty Burger at your door step",
    },
    Banner {
        title: "Spices",
        src: "/static/food.jpg",
        text: "All Cuisines",
    },
    Banner {
        title: "New York",
        src: "/static/tasty.jpg",
        text: "Food is incomplete without a tasty dessert",
    },
];

/// `GET /api/banners` - the static banner list.
pub async fn index() -> Json<Vec<Banner>> {
    Json(BANNERS.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banners_serialize() {
        let json = serde_json::to_value(BANNERS).expect("serialize");
        let list = json.as_array().expect("array");
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["title"], "Burger");
        assert_eq!(list[0]["src"], "/static/burger.jpg");
    }
}
