//! Geolocation rasters.
//!
//! A `GeoRaster` describes where the geolocation samples of a swath scene
//! sit and what they contain. Two shapes are supported:
//!
//! - **dense**: one longitude/latitude sample per scene pixel, sampled at
//!   pixel centers (offset 0.5, subsampling 1)
//! - **tie-point**: a coarser grid whose first sample sits at
//!   (`offset_x`, `offset_y`) and whose samples are `subsampling_x` /
//!   `subsampling_y` pixels apart
//!
//! Sample arrays are row-major and shared behind `Arc`, so cloning a raster
//! to hand it to several codings does not copy the samples.

use std::sync::Arc;

use crate::error::{GeoCodingError, GeoCodingResult};
use crate::pos::GeoPos;

/// Immutable description of a geolocation source.
#[derive(Debug, Clone)]
pub struct GeoRaster {
    longitudes: Arc<[f64]>,
    latitudes: Arc<[f64]>,
    scene_width: usize,
    scene_height: usize,
    raster_width: usize,
    raster_height: usize,
    offset_x: f64,
    offset_y: f64,
    subsampling_x: f64,
    subsampling_y: f64,
    resolution_km: f64,
    crosses_anti_meridian: bool,
}

impl GeoRaster {
    /// Create a dense raster with one geolocation sample per pixel.
    ///
    /// # Arguments
    /// * `longitudes` - Row-major longitudes, `width * height` values
    /// * `latitudes` - Row-major latitudes, `width * height` values
    /// * `width` - Scene (and raster) width in pixels
    /// * `height` - Scene (and raster) height in pixels
    /// * `resolution_km` - Nominal ground sample distance
    pub fn dense(
        longitudes: Vec<f64>,
        latitudes: Vec<f64>,
        width: usize,
        height: usize,
        resolution_km: f64,
    ) -> GeoCodingResult<Self> {
        Self::tie_point(
            longitudes,
            latitudes,
            width,
            height,
            width,
            height,
            0.5,
            0.5,
            1.0,
            1.0,
            resolution_km,
        )
    }

    /// Create a raster from a subsampled tie-point grid.
    ///
    /// # Arguments
    /// * `longitudes` - Row-major tie-point longitudes, `raster_width * raster_height` values
    /// * `latitudes` - Row-major tie-point latitudes, `raster_width * raster_height` values
    /// * `scene_width` - Width of the full pixel grid
    /// * `scene_height` - Height of the full pixel grid
    /// * `raster_width` - Number of tie points per row
    /// * `raster_height` - Number of tie-point rows
    /// * `offset_x` - Pixel x coordinate of the first tie point
    /// * `offset_y` - Pixel y coordinate of the first tie point
    /// * `subsampling_x` - Pixels between tie points along x
    /// * `subsampling_y` - Pixels between tie points along y
    /// * `resolution_km` - Nominal ground sample distance of a scene pixel
    #[allow(clippy::too_many_arguments)]
    pub fn tie_point(
        longitudes: Vec<f64>,
        latitudes: Vec<f64>,
        scene_width: usize,
        scene_height: usize,
        raster_width: usize,
        raster_height: usize,
        offset_x: f64,
        offset_y: f64,
        subsampling_x: f64,
        subsampling_y: f64,
        resolution_km: f64,
    ) -> GeoCodingResult<Self> {
        if scene_width == 0 || scene_height == 0 {
            return Err(GeoCodingError::invalid_raster(format!(
                "scene dimensions must be positive, got {}x{}",
                scene_width, scene_height
            )));
        }
        if raster_width == 0 || raster_height == 0 {
            return Err(GeoCodingError::invalid_raster(format!(
                "raster dimensions must be positive, got {}x{}",
                raster_width, raster_height
            )));
        }

        let expected = raster_width * raster_height;
        if longitudes.len() != expected {
            return Err(GeoCodingError::dimension_mismatch(
                "longitudes",
                expected,
                longitudes.len(),
            ));
        }
        if latitudes.len() != expected {
            return Err(GeoCodingError::dimension_mismatch(
                "latitudes",
                expected,
                latitudes.len(),
            ));
        }

        if !(subsampling_x > 0.0 && subsampling_y > 0.0) {
            return Err(GeoCodingError::invalid_raster(format!(
                "subsampling must be positive, got ({}, {})",
                subsampling_x, subsampling_y
            )));
        }
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(GeoCodingError::invalid_raster("offsets must be finite"));
        }
        if !(resolution_km.is_finite() && resolution_km > 0.0) {
            return Err(GeoCodingError::invalid_raster(format!(
                "resolution must be a positive number of km, got {}",
                resolution_km
            )));
        }

        // The tie-point grid must not be wider than the scene it geolocates
        if raster_width > scene_width || raster_height > scene_height {
            return Err(GeoCodingError::invalid_raster(format!(
                "raster {}x{} is larger than scene {}x{}",
                raster_width, raster_height, scene_width, scene_height
            )));
        }

        let crosses_anti_meridian = contains_anti_meridian(&longitudes, raster_width, raster_height);

        Ok(Self {
            longitudes: longitudes.into(),
            latitudes: latitudes.into(),
            scene_width,
            scene_height,
            raster_width,
            raster_height,
            offset_x,
            offset_y,
            subsampling_x,
            subsampling_y,
            resolution_km,
            crosses_anti_meridian,
        })
    }

    /// Row-major longitude samples.
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// Row-major latitude samples.
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn scene_width(&self) -> usize {
        self.scene_width
    }

    pub fn scene_height(&self) -> usize {
        self.scene_height
    }

    pub fn raster_width(&self) -> usize {
        self.raster_width
    }

    pub fn raster_height(&self) -> usize {
        self.raster_height
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn subsampling_x(&self) -> f64 {
        self.subsampling_x
    }

    pub fn subsampling_y(&self) -> f64 {
        self.subsampling_y
    }

    /// Nominal ground sample distance in kilometers.
    pub fn resolution_km(&self) -> f64 {
        self.resolution_km
    }

    /// Whether any two neighbouring longitude samples are more than 180° apart.
    pub fn crosses_anti_meridian(&self) -> bool {
        self.crosses_anti_meridian
    }

    /// True when the raster holds one sample per scene pixel.
    pub fn is_dense(&self) -> bool {
        self.raster_width == self.scene_width
            && self.raster_height == self.scene_height
            && self.subsampling_x == 1.0
            && self.subsampling_y == 1.0
    }

    /// Number of samples in the raster.
    pub fn len(&self) -> usize {
        self.raster_width * self.raster_height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of the sample at raster column `x`, row `y`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.raster_width + x
    }

    /// Longitude of the sample at raster column `x`, row `y`.
    #[inline]
    pub fn lon(&self, x: usize, y: usize) -> f64 {
        self.longitudes[self.index(x, y)]
    }

    /// Latitude of the sample at raster column `x`, row `y`.
    #[inline]
    pub fn lat(&self, x: usize, y: usize) -> f64 {
        self.latitudes[self.index(x, y)]
    }

    /// The sample at raster column `x`, row `y`, or `None` outside the raster.
    pub fn sample(&self, x: usize, y: usize) -> Option<GeoPos> {
        if x >= self.raster_width || y >= self.raster_height {
            return None;
        }
        let i = self.index(x, y);
        Some(GeoPos::new(self.latitudes[i], self.longitudes[i]))
    }
}

/// Detect a longitude jump of more than 180° between horizontally or
/// vertically adjacent samples. NaN samples are ignored.
pub fn contains_anti_meridian(longitudes: &[f64], width: usize, height: usize) -> bool {
    if width == 0 || longitudes.len() < width * height {
        return false;
    }
    for y in 0..height {
        let row = &longitudes[y * width..(y + 1) * width];
        for x in 0..width {
            let lon = row[x];
            if lon.is_nan() {
                continue;
            }
            if x + 1 < width {
                let right = row[x + 1];
                if (right - lon).abs() > 180.0 {
                    return true;
                }
            }
            if y + 1 < height {
                let below = longitudes[(y + 1) * width + x];
                if (below - lon).abs() > 180.0 {
                    return true;
                }
            }
        }
    }
    false
}
