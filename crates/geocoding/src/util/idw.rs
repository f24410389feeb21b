//! Sub-pixel refinement of dense inverse matches.

use geo_common::{GeoPos, GeoRaster};

use super::distance::lon_diff;

/// Distance below which the query is considered to sit on a sample.
const EXACT_HIT: f64 = 1e-12;

/// Refines an integer raster match into fractional sample coordinates by
/// blending the positions of the surrounding samples with weights
/// proportional to the inverse of their distance to the query.
#[derive(Debug, Clone, Copy)]
pub struct InverseDistanceWeightingInterpolator {
    radius: usize,
}

impl Default for InverseDistanceWeightingInterpolator {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

impl InverseDistanceWeightingInterpolator {
    /// Interpolator blending a `(2 * radius + 1)`-square neighbourhood.
    pub fn new(radius: usize) -> Self {
        Self {
            radius: radius.max(1),
        }
    }

    /// Fractional sample coordinates near sample (`x`, `y`) for `geo`.
    ///
    /// Coordinates are in sample space; the caller adds the raster offset.
    /// Returns the integer match unchanged when no neighbour is usable.
    pub fn interpolate(&self, raster: &GeoRaster, geo: &GeoPos, x: usize, y: usize) -> (f64, f64) {
        let width = raster.raster_width();
        let height = raster.raster_height();
        let cos_lat = geo.lat.to_radians().cos();

        let x_min = x.saturating_sub(self.radius);
        let y_min = y.saturating_sub(self.radius);
        let x_max = (x + self.radius).min(width - 1);
        let y_max = (y + self.radius).min(height - 1);

        let mut weight_sum = 0.0;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;

        for j in y_min..=y_max {
            for i in x_min..=x_max {
                let lat = raster.lat(i, j);
                let lon = raster.lon(i, j);
                if lat.is_nan() || lon.is_nan() {
                    continue;
                }
                let d_lat = lat - geo.lat;
                let d_lon = cos_lat * lon_diff(lon, geo.lon);
                let distance = (d_lat * d_lat + d_lon * d_lon).sqrt();
                if distance < EXACT_HIT {
                    return (i as f64, j as f64);
                }
                let w = 1.0 / distance;
                weight_sum += w;
                sum_x += w * i as f64;
                sum_y += w * j as f64;
            }
        }

        if weight_sum > 0.0 {
            (sum_x / weight_sum, sum_y / weight_sum)
        } else {
            (x as f64, y as f64)
        }
    }
}
