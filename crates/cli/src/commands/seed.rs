//! Seed the database with a demo catalog.
//!
//! Inserts a small set of restaurants, categories, products, and menu items
//! so a fresh environment has something to list and match against. Safe to
//! re-run: rows are keyed by name and skipped if already present.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use super::{CommandError, database_url};

struct SeedProduct {
    name: &'static str,
    category: &'static str,
    price: &'static str,
    ingredients: &'static str,
}

const RESTAURANTS: [(&str, &str, &str); 3] = [
    ("FoodCart Central", "Moscow, Tverskaya 6", "+7 495 000-00-01"),
    ("FoodCart Arbat", "Moscow, Arbat 24", "+7 495 000-00-02"),
    ("FoodCart Park", "Moscow, Leninsky prospekt 30", "+7 495 000-00-03"),
];

const PRODUCTS: [SeedProduct; 4] = [
    SeedProduct {
        name: "Classic burger",
        category: "Burgers",
        price: "250.00",
        ingredients: "beef, bun, pickles, onion",
    },
    SeedProduct {
        name: "Cheeseburger",
        category: "Burgers",
        price: "290.00",
        ingredients: "beef, bun, cheddar, pickles",
    },
    SeedProduct {
        name: "Fries",
        category: "Sides",
        price: "120.00",
        ingredients: "potato, salt",
    },
    SeedProduct {
        name: "Cola",
        category: "Drinks",
        price: "90.00",
        ingredients: "",
    },
];

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    for (name, address, phone) in RESTAURANTS {
        sqlx::query(
            r"
            INSERT INTO restaurants (name, address, contact_phone)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM restaurants WHERE name = $1)
            ",
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .execute(&pool)
        .await?;
    }
    info!(count = RESTAURANTS.len(), "Restaurants seeded");

    for product in PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO product_categories (name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM product_categories WHERE name = $1)
            ",
        )
        .bind(product.category)
        .execute(&pool)
        .await?;

        let price: Decimal = product
            .price
            .parse()
            .map_err(|_| CommandError::InvalidSeed(format!("bad price for {}", product.name)))?;

        sqlx::query(
            r"
            INSERT INTO products (name, category_id, price, ingredients)
            SELECT $1, c.id, $2, $3
            FROM product_categories c
            WHERE c.name = $4
              AND NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            ",
        )
        .bind(product.name)
        .bind(price)
        .bind(product.ingredients)
        .bind(product.category)
        .execute(&pool)
        .await?;
    }
    info!(count = PRODUCTS.len(), "Products seeded");

    // Every restaurant stocks every product; toggle availability by hand to
    // exercise matching.
    sqlx::query(
        r"
        INSERT INTO menu_items (restaurant_id, product_id)
        SELECT r.id, p.id
        FROM restaurants r CROSS JOIN products p
        ON CONFLICT (restaurant_id, product_id) DO NOTHING
        ",
    )
    .execute(&pool)
    .await?;
    info!("Menu items seeded");

    Ok(())
}
