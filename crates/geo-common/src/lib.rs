//! Common types shared by the swath geocoding crates.
//!
//! Holds the leaf value types (`PixelPos`, `GeoPos`), the immutable
//! geolocation source (`GeoRaster`) and the error type used by every
//! setup-time operation.

pub mod error;
pub mod pos;
pub mod raster;

pub use error::{GeoCodingError, GeoCodingResult};
pub use pos::{GeoPos, PixelPos};
pub use raster::{contains_anti_meridian, GeoRaster};
