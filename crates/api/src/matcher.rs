//! Restaurant assignment for orders.
//!
//! Given an order's distinct products, compute the set of restaurants whose
//! available menu items cover every product, then rank them by geodesic
//! distance from the delivery address, nearest first.

use std::collections::{BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use foodcart_core::{InvalidCoordinateError, OrderId, ProductId, RestaurantId};

use crate::geo::{
    CacheKey, CoordinateResolver, Geocode, GeocodingError, ORDER_COORDINATE_TTL, distance_km,
};
use crate::models::Restaurant;

/// An available (restaurant, product) listing, as loaded from the menu.
#[derive(Debug, Clone, Copy)]
pub struct MenuListing {
    pub restaurant_id: RestaurantId,
    pub product_id: ProductId,
}

/// A qualifying restaurant with its distance to the delivery address.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRestaurant {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub distance_km: Decimal,
}

/// A match computation failed before producing a ranking.
///
/// "Nobody can fulfill this order" is NOT an error; it is an empty ranking.
/// These variants mean we could not determine where to deliver or how far a
/// qualifying restaurant is, and no partial ranking is returned.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Resolving the delivery or a restaurant address failed.
    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),

    /// The geocoder produced an out-of-range coordinate.
    #[error("distance computation failed: {0}")]
    InvalidCoordinate(#[from] InvalidCoordinateError),
}

/// Restaurants whose available listings cover every product in `wanted`.
///
/// Computed as an intersection fold over per-product restaurant-identity
/// sets. An empty `wanted` set, or any product with no stocking restaurant,
/// yields an empty result.
#[must_use]
pub fn qualifying_restaurants(
    wanted: &HashSet<ProductId>,
    listings: &[MenuListing],
) -> BTreeSet<RestaurantId> {
    if wanted.is_empty() {
        return BTreeSet::new();
    }

    let mut per_product: HashMap<ProductId, BTreeSet<RestaurantId>> = HashMap::new();
    for listing in listings {
        if wanted.contains(&listing.product_id) {
            per_product
                .entry(listing.product_id)
                .or_default()
                .insert(listing.restaurant_id);
        }
    }

    let mut qualifying: Option<BTreeSet<RestaurantId>> = None;
    for product_id in wanted {
        let Some(stockists) = per_product.get(product_id) else {
            // A product nobody stocks empties the intersection outright.
            return BTreeSet::new();
        };
        qualifying = Some(match qualifying {
            None => stockists.clone(),
            Some(acc) => acc.intersection(stockists).copied().collect(),
        });
    }

    qualifying.unwrap_or_default()
}

/// Ranks qualifying restaurants for orders.
pub struct RestaurantMatcher<G> {
    resolver: CoordinateResolver<G>,
}

impl<G: Geocode> RestaurantMatcher<G> {
    /// Create a matcher with a fresh coordinate cache in front of `geocoder`.
    #[must_use]
    pub fn new(geocoder: G) -> Self {
        Self {
            resolver: CoordinateResolver::new(geocoder),
        }
    }

    /// Rank the restaurants able to fulfill the entire order, nearest first.
    ///
    /// `wanted` is the order's distinct product set, `listings` the available
    /// menu rows for those products, and `restaurants` the candidate rows
    /// (restaurants absent from `restaurants` cannot be ranked and are
    /// expected to be a superset of the qualifying ids).
    ///
    /// If no restaurant qualifies, returns an empty vector without touching
    /// the geocoder. Ties in distance are broken by restaurant id.
    ///
    /// # Errors
    ///
    /// Propagates [`MatchError`] on any geocoding or distance failure; no
    /// partial ranking is returned in that case.
    #[instrument(skip(self, wanted, listings, restaurants), fields(order_id = %order_id))]
    pub async fn rank(
        &self,
        order_id: OrderId,
        delivery_address: &str,
        wanted: &HashSet<ProductId>,
        listings: &[MenuListing],
        restaurants: &[Restaurant],
    ) -> Result<Vec<RankedRestaurant>, MatchError> {
        let qualifying = qualifying_restaurants(wanted, listings);
        if qualifying.is_empty() {
            return Ok(Vec::new());
        }

        let delivery = self
            .resolver
            .resolve(
                CacheKey::Order(order_id),
                delivery_address,
                Some(ORDER_COORDINATE_TTL),
            )
            .await?;

        let mut ranked = Vec::with_capacity(qualifying.len());
        for restaurant in restaurants.iter().filter(|r| qualifying.contains(&r.id)) {
            let site = self
                .resolver
                .resolve(CacheKey::Restaurant(restaurant.id), &restaurant.address, None)
                .await?;
            let distance_km = distance_km(delivery, site)?;
            ranked.push(RankedRestaurant {
                restaurant: restaurant.clone(),
                distance_km,
            });
        }

        ranked.sort_by(|a, b| {
            a.distance_km
                .cmp(&b.distance_km)
                .then_with(|| a.restaurant.id.cmp(&b.restaurant.id))
        });
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use foodcart_core::Coordinate;

    use super::*;

    fn listing(restaurant: i32, product: i32) -> MenuListing {
        MenuListing {
            restaurant_id: RestaurantId::new(restaurant),
            product_id: ProductId::new(product),
        }
    }

    fn restaurant(id: i32, name: &str, address: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: name.to_string(),
            address: address.to_string(),
            contact_phone: String::new(),
        }
    }

    fn wanted(products: &[i32]) -> HashSet<ProductId> {
        products.iter().copied().map(ProductId::new).collect()
    }

    /// Geocoder backed by an address -> coordinate table, counting calls.
    struct TableGeocoder {
        table: Mutex<HashMap<String, Coordinate>>,
        calls: AtomicUsize,
    }

    impl TableGeocoder {
        fn new(entries: &[(&str, Coordinate)]) -> Self {
            Self {
                table: Mutex::new(
                    entries
                        .iter()
                        .map(|(addr, coord)| ((*addr).to_string(), *coord))
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocode for &TableGeocoder {
        async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table
                .lock()
                .expect("lock")
                .get(address)
                .copied()
                .ok_or_else(|| GeocodingError::NoResults(address.to_string()))
        }
    }

    // Delivery point plus two restaurant sites at known geodesic distances.
    const DELIVERY: Coordinate = Coordinate::new(55.7558, 37.6173);
    const NEAR_SITE: Coordinate = Coordinate::new(55.7650, 37.6200);
    const FAR_SITE: Coordinate = Coordinate::new(55.7800, 37.6500);

    #[test]
    fn test_qualifying_intersects_per_product_sets() {
        // R1 stocks products 1 and 2, R2 stocks only product 1.
        let listings = [listing(1, 1), listing(1, 2), listing(2, 1)];
        let result = qualifying_restaurants(&wanted(&[1, 2]), &listings);
        assert_eq!(result, BTreeSet::from([RestaurantId::new(1)]));
    }

    #[test]
    fn test_qualifying_empty_order_is_empty() {
        let listings = [listing(1, 1)];
        assert!(qualifying_restaurants(&wanted(&[]), &listings).is_empty());
    }

    #[test]
    fn test_qualifying_unstocked_product_empties_result() {
        let listings = [listing(1, 1), listing(2, 1)];
        assert!(qualifying_restaurants(&wanted(&[1, 99]), &listings).is_empty());
    }

    #[test]
    fn test_qualifying_returns_all_joint_stockists() {
        let listings = [
            listing(1, 1),
            listing(1, 2),
            listing(2, 1),
            listing(2, 2),
            listing(3, 2),
        ];
        let result = qualifying_restaurants(&wanted(&[1, 2]), &listings);
        assert_eq!(
            result,
            BTreeSet::from([RestaurantId::new(1), RestaurantId::new(2)])
        );
    }

    #[tokio::test]
    async fn test_empty_order_never_calls_geocoder() {
        let geocoder = TableGeocoder::new(&[]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let ranked = matcher
            .rank(
                OrderId::new(1),
                "Moscow, Tverskaya 1",
                &wanted(&[]),
                &[],
                &[],
            )
            .await
            .expect("rank");

        assert!(ranked.is_empty());
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unstocked_product_never_calls_geocoder() {
        let geocoder = TableGeocoder::new(&[]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let ranked = matcher
            .rank(
                OrderId::new(1),
                "Moscow, Tverskaya 1",
                &wanted(&[1]),
                &[],
                &[restaurant(1, "A", "Somewhere 1")],
            )
            .await
            .expect("rank");

        assert!(ranked.is_empty());
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_stockist_is_excluded() {
        let geocoder = TableGeocoder::new(&[
            ("Delivery st 1", DELIVERY),
            ("Near st 1", NEAR_SITE),
            ("Far st 1", FAR_SITE),
        ]);
        let matcher = RestaurantMatcher::new(&geocoder);

        // A stocks both products, B stocks only product 1.
        let listings = [listing(1, 1), listing(1, 2), listing(2, 1)];
        let restaurants = [
            restaurant(1, "A", "Near st 1"),
            restaurant(2, "B", "Far st 1"),
        ];

        let ranked = matcher
            .rank(
                OrderId::new(1),
                "Delivery st 1",
                &wanted(&[1, 2]),
                &listings,
                &restaurants,
            )
            .await
            .expect("rank");

        let names: Vec<&str> = ranked.iter().map(|r| r.restaurant.name.as_str()).collect();
        assert_eq!(names, ["A"]);
    }

    #[tokio::test]
    async fn test_ranking_is_nearest_first_with_distances() {
        let geocoder = TableGeocoder::new(&[
            ("Delivery st 1", DELIVERY),
            ("Near st 1", NEAR_SITE),
            ("Far st 1", FAR_SITE),
        ]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let listings = [listing(1, 1), listing(2, 1)];
        let restaurants = [
            restaurant(1, "Far", "Far st 1"),
            restaurant(2, "Near", "Near st 1"),
        ];

        let ranked = matcher
            .rank(
                OrderId::new(1),
                "Delivery st 1",
                &wanted(&[1]),
                &listings,
                &restaurants,
            )
            .await
            .expect("rank");

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].restaurant.name, "Near");
        assert_eq!(ranked[1].restaurant.name, "Far");
        assert!(ranked[0].distance_km < ranked[1].distance_km);
        // Distances come back as exact 3-dp decimals.
        assert!(ranked[0].distance_km.scale() <= 3);
        assert!(ranked[0].distance_km > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_geocoding_failure_propagates_without_partial_ranking() {
        // Delivery address resolves, the restaurant address does not.
        let geocoder = TableGeocoder::new(&[("Delivery st 1", DELIVERY)]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let listings = [listing(1, 1)];
        let restaurants = [restaurant(1, "A", "Unknown st 1")];

        let result = matcher
            .rank(
                OrderId::new(1),
                "Delivery st 1",
                &wanted(&[1]),
                &listings,
                &restaurants,
            )
            .await;

        assert!(matches!(
            result,
            Err(MatchError::Geocoding(GeocodingError::NoResults(_)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_delivery_address_propagates() {
        let geocoder = TableGeocoder::new(&[("Near st 1", NEAR_SITE)]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let listings = [listing(1, 1)];
        let restaurants = [restaurant(1, "A", "Near st 1")];

        let result = matcher
            .rank(
                OrderId::new(1),
                "Nowhere at all",
                &wanted(&[1]),
                &listings,
                &restaurants,
            )
            .await;

        assert!(matches!(result, Err(MatchError::Geocoding(_))));
        // Failed before any restaurant lookup.
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_restaurant_coordinates_resolved_once_across_orders() {
        let geocoder = TableGeocoder::new(&[
            ("Delivery st 1", DELIVERY),
            ("Delivery st 2", DELIVERY),
            ("Delivery st 3", DELIVERY),
            ("Delivery st 4", DELIVERY),
            ("Delivery st 5", DELIVERY),
            ("Near st 1", NEAR_SITE),
        ]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let listings = [listing(1, 1)];
        let restaurants = [restaurant(1, "A", "Near st 1")];

        for order in 1..=5 {
            matcher
                .rank(
                    OrderId::new(order),
                    &format!("Delivery st {order}"),
                    &wanted(&[1]),
                    &listings,
                    &restaurants,
                )
                .await
                .expect("rank");
        }

        // 5 delivery lookups plus exactly one restaurant lookup.
        assert_eq!(geocoder.call_count(), 6);
    }

    #[tokio::test]
    async fn test_out_of_range_provider_coordinates_rejected() {
        let geocoder = TableGeocoder::new(&[
            ("Delivery st 1", DELIVERY),
            ("Broken st 1", Coordinate::new(95.0, 37.0)),
        ]);
        let matcher = RestaurantMatcher::new(&geocoder);

        let listings = [listing(1, 1)];
        let restaurants = [restaurant(1, "A", "Broken st 1")];

        let result = matcher
            .rank(
                OrderId::new(1),
                "Delivery st 1",
                &wanted(&[1]),
                &listings,
                &restaurants,
            )
            .await;

        assert!(matches!(result, Err(MatchError::InvalidCoordinate(_))));
    }
}
