//! Pixel and geographic positions.
//!
//! Both types are small `Copy` values. An invalid position carries `NaN` in
//! both components so it propagates through arithmetic without special cases.

use serde::{Deserialize, Serialize};

/// A continuous position in raster coordinates.
///
/// Integer values lie on pixel corners, so the center of pixel (3, 7) is
/// (3.5, 7.5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    /// Create a new pixel position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// A position is valid when neither component is NaN.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }

    /// Mark this position invalid in place.
    #[inline]
    pub fn set_invalid(&mut self) {
        self.x = f64::NAN;
        self.y = f64::NAN;
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    /// Latitude in degrees, -90 to 90
    pub lat: f64,
    /// Longitude in degrees, -180 to 180
    pub lon: f64,
}

impl GeoPos {
    /// Create a new geographic position.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self {
            lat: f64::NAN,
            lon: f64::NAN,
        }
    }

    /// Valid iff neither component is NaN and the latitude is within [-90, 90].
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.lat.is_nan() && !self.lon.is_nan() && (-90.0..=90.0).contains(&self.lat)
    }

    /// Mark this position invalid in place.
    #[inline]
    pub fn set_invalid(&mut self) {
        self.lat = f64::NAN;
        self.lon = f64::NAN;
    }

    /// Return a copy with the longitude wrapped into [-180, 180].
    ///
    /// An infinite longitude becomes NaN.
    pub fn normalized(&self) -> Self {
        let lon = if !self.lon.is_finite() {
            f64::NAN
        } else if (-180.0..=180.0).contains(&self.lon) {
            self.lon
        } else {
            (self.lon + 180.0).rem_euclid(360.0) - 180.0
        };
        Self { lat: self.lat, lon }
    }
}
