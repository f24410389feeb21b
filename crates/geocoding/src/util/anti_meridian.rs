//! Longitude interpolation across the ±180° seam.
//!
//! Longitudes on either side of the antimeridian differ by almost 360°, so
//! blending them directly lands on the wrong side of the globe. The
//! interpolator rebases every sample of a small window into the frame of the
//! first valid sample, interpolates there and wraps the result back into
//! [-180, 180].

use serde::{Deserialize, Serialize};

use super::distance::normalize_lon;
use super::interpolation::{bicubic_with, bilinear_with};

/// Interpolation kernel used inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LonInterpolation {
    #[default]
    Bilinear,
    Cubic,
}

/// Seam-safe longitude interpolator over a small row-major window.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntiMeridianLonInterpolator {
    method: LonInterpolation,
}

impl AntiMeridianLonInterpolator {
    pub const fn new(method: LonInterpolation) -> Self {
        Self { method }
    }

    pub const fn bilinear() -> Self {
        Self::new(LonInterpolation::Bilinear)
    }

    pub const fn cubic() -> Self {
        Self::new(LonInterpolation::Cubic)
    }

    pub fn method(&self) -> LonInterpolation {
        self.method
    }

    /// Interpolate the longitude at window column `x`, row `y`.
    ///
    /// `window` holds `width * height` longitudes in degrees. Returns NaN
    /// when the window has no valid sample.
    pub fn interpolate(&self, window: &[f64], width: usize, height: usize, x: f64, y: f64) -> f64 {
        let n = (width * height).min(window.len());
        let Some(reference) = window[..n].iter().copied().find(|v| !v.is_nan()) else {
            return f64::NAN;
        };

        let rebased = |i: usize, j: usize| rebase(window[j * width + i], reference);
        let lon = match self.method {
            LonInterpolation::Bilinear => bilinear_with(width, height, x, y, rebased),
            LonInterpolation::Cubic => bicubic_with(width, height, x, y, rebased),
        };
        normalize_lon(lon)
    }
}

/// Shift `lon` by ±360° so it lies within 180° of `reference`.
#[inline]
pub fn rebase(lon: f64, reference: f64) -> f64 {
    let d = lon - reference;
    if d > 180.0 {
        lon - 360.0
    } else if d < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
