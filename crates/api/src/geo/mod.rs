//! Geocoding, distance, and coordinate caching.
//!
//! # Architecture
//!
//! - [`Geocoder`] resolves a free-text address to coordinates via an
//!   external geocoding provider over `reqwest`. The [`Geocode`] trait is the
//!   seam that lets tests substitute a deterministic fake.
//! - [`distance_km`] computes geodesic distance on the WGS-84 ellipsoid and
//!   returns exact `Decimal` kilometers rounded to 3 places.
//! - [`CoordinateResolver`] wraps a `moka` cache in front of a geocoder.
//!   Restaurant coordinates are cached indefinitely under the restaurant's
//!   id; delivery coordinates are cached under the order's id with a 7-day
//!   TTL. The TTL is an explicit parameter at each call site.
//!
//! The geocoding call is the only suspension point in a match computation
//! and always happens outside the cache; two concurrent misses for the same
//! key may both hit the provider, which is harmless (last writer wins, both
//! results are equivalent for the same address).

mod cache;
mod distance;
mod geocoder;
mod resolver;

pub use cache::CacheKey;
pub use distance::distance_km;
pub use geocoder::{Geocode, Geocoder, GeocoderConfig};
pub use resolver::{CoordinateResolver, ORDER_COORDINATE_TTL};

use thiserror::Error;

/// Errors that can occur while resolving an address to coordinates.
///
/// There is no built-in retry: a single failed attempt is terminal for the
/// request and the caller decides how to surface it.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider responded with a non-success status.
    #[error("geocoder returned status {0}")]
    Status(u16),

    /// Provider response body could not be parsed.
    #[error("geocoder response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Provider returned zero candidates for the address.
    #[error("no locations found for address: {0}")]
    NoResults(String),

    /// Provider returned a coordinate pair that is not "longitude latitude".
    #[error("malformed coordinate pair in geocoder response: {0:?}")]
    MalformedPair(String),
}
