//! Geographic coordinates.
//!
//! `Coordinate` is a plain latitude/longitude pair. Construction does not
//! validate ranges; distance computation rejects out-of-range values with
//! [`InvalidCoordinateError`] so that junk returned by an upstream geocoder
//! surfaces at the point where it would corrupt a result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic coordinate with latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

/// A coordinate outside the valid latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
pub struct InvalidCoordinateError {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if the coordinate has valid values.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Check the coordinate against valid latitude/longitude ranges.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either component is out of range
    /// (this includes NaN, which fails every comparison).
    pub fn validate(&self) -> Result<(), InvalidCoordinateError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(InvalidCoordinateError {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}
