//! Cache types for resolved coordinates.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

use foodcart_core::{Coordinate, OrderId, RestaurantId};

/// Cache key for resolved coordinates.
///
/// Keys are entity identities, not address strings: a restaurant's entry is
/// reused for the restaurant's lifetime, an order's entry for the life of
/// that delivery.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Restaurant(RestaurantId),
    Order(OrderId),
}

/// A cached coordinate together with the TTL it was stored under.
///
/// `ttl: None` means the entry never expires.
#[derive(Debug, Clone, Copy)]
pub struct CachedCoordinate {
    pub coordinate: Coordinate,
    pub ttl: Option<Duration>,
}

/// Per-entry expiry policy: each entry carries its own TTL.
struct PerEntryTtl;

impl Expiry<CacheKey, CachedCoordinate> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CachedCoordinate,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Build the coordinate cache used by [`super::CoordinateResolver`].
#[must_use]
pub fn coordinate_cache() -> Cache<CacheKey, CachedCoordinate> {
    Cache::builder()
        .max_capacity(10_000)
        .expire_after(PerEntryTtl)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_without_ttl_survives() {
        let cache = coordinate_cache();
        let key = CacheKey::Restaurant(RestaurantId::new(1));
        cache
            .insert(
                key,
                CachedCoordinate {
                    coordinate: Coordinate::new(55.75, 37.61),
                    ttl: None,
                },
            )
            .await;

        cache.run_pending_tasks().await;
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_entry_with_ttl_expires() {
        let cache = coordinate_cache();
        let key = CacheKey::Order(OrderId::new(1));
        cache
            .insert(
                key,
                CachedCoordinate {
                    coordinate: Coordinate::new(55.75, 37.61),
                    ttl: Some(Duration::from_millis(20)),
                },
            )
            .await;

        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        cache.run_pending_tasks().await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_restaurant_and_order_keys_do_not_collide() {
        let cache = coordinate_cache();
        let restaurant = CacheKey::Restaurant(RestaurantId::new(7));
        let order = CacheKey::Order(OrderId::new(7));

        cache
            .insert(
                restaurant,
                CachedCoordinate {
                    coordinate: Coordinate::new(1.0, 1.0),
                    ttl: None,
                },
            )
            .await;

        assert!(cache.get(&order).await.is_none());
    }
}
