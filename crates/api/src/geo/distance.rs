//! Geodesic distance between coordinate pairs.

use geo::{Point, prelude::GeodesicDistance};
use rust_decimal::Decimal;

use foodcart_core::{Coordinate, InvalidCoordinateError};

/// Geodesic (ellipsoidal-earth, WGS-84) distance between two points, in
/// kilometers rounded to 3 decimal places with round-half-to-even.
///
/// Pure function; symmetric in its arguments.
///
/// # Errors
///
/// Returns [`InvalidCoordinateError`] if either point is outside the valid
/// latitude/longitude ranges.
pub fn distance_km(a: Coordinate, b: Coordinate) -> Result<Decimal, InvalidCoordinateError> {
    a.validate()?;
    b.validate()?;

    // geo points are (x, y) = (longitude, latitude)
    let meters = Point::new(a.longitude, a.latitude)
        .geodesic_distance(&Point::new(b.longitude, b.latitude));

    // Geodesic distance over validated coordinates is always finite.
    let km = Decimal::from_f64_retain(meters / 1000.0).unwrap_or_default();
    Ok(km.round_dp(3))
}
