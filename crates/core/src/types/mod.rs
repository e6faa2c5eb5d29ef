//! Core types for FoodCart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coordinate;
pub mod id;
pub mod status;

pub use coordinate::{Coordinate, InvalidCoordinateError};
pub use id::*;
pub use status::*;
