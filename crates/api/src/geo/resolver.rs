//! Lookup-or-resolve coordinate resolution with caching.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use foodcart_core::Coordinate;

use super::cache::{CacheKey, CachedCoordinate, coordinate_cache};
use super::{Geocode, GeocodingError};

/// TTL for delivery (order) coordinates: a customer's address is only
/// relevant for the life of that delivery.
pub const ORDER_COORDINATE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Resolves addresses to coordinates through an injected cache.
///
/// One resolver instance is shared per process; it is constructed explicitly
/// (never ambient global state) so tests can substitute a deterministic
/// geocoder and assert upstream call counts.
pub struct CoordinateResolver<G> {
    geocoder: G,
    cache: Cache<CacheKey, CachedCoordinate>,
}

impl<G: Geocode> CoordinateResolver<G> {
    /// Create a resolver with a fresh cache in front of `geocoder`.
    #[must_use]
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            cache: coordinate_cache(),
        }
    }

    /// Return the cached coordinates for `key`, or resolve `address` through
    /// the geocoder and cache the result under `key` with the given TTL.
    ///
    /// `ttl: None` caches indefinitely (restaurant call sites); orders pass
    /// [`ORDER_COORDINATE_TTL`]. A cached entry is keyed by identity, not by
    /// the address string: editing an entity's address does NOT invalidate
    /// its entry.
    ///
    /// The geocoder call happens outside the cache, so concurrent misses for
    /// the same key may each hit the provider once; last writer wins.
    ///
    /// # Errors
    ///
    /// Propagates [`GeocodingError`] from the provider on a cache miss.
    pub async fn resolve(
        &self,
        key: CacheKey,
        address: &str,
        ttl: Option<Duration>,
    ) -> Result<Coordinate, GeocodingError> {
        if let Some(hit) = self.cache.get(&key).await {
            debug!(?key, "Coordinate cache hit");
            return Ok(hit.coordinate);
        }

        let coordinate = self.geocoder.geocode(address).await?;
        self.cache
            .insert(key, CachedCoordinate { coordinate, ttl })
            .await;
        Ok(coordinate)
    }
}
