//! Synthetic swath geolocation for tests, benches and the accuracy binary.
//!
//! A [`SwathModel`] places a scene on a local tangent plane around a center
//! point, rotates it by a heading and bends the across-track lines by a small
//! quadratic term, which is roughly what a push-broom scanner sees. Every
//! position is computed analytically, so interpolated results can be
//! compared against ground truth at any fractional pixel.

use geo_common::{GeoCodingResult, GeoPos, GeoRaster};

use crate::util::normalize_lon;

/// Kilometers per degree of latitude on the mean sphere.
const KM_PER_DEG: f64 = 111.195;

/// Analytic swath geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwathModel {
    pub width: usize,
    pub height: usize,
    pub resolution_km: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    /// Track rotation in degrees, clockwise from north.
    pub heading: f64,
    /// Along-track bend in km per km² of across-track distance.
    pub curvature: f64,
}

impl Default for SwathModel {
    fn default() -> Self {
        Self {
            width: 120,
            height: 80,
            resolution_km: 1.1,
            center_lat: 45.0,
            center_lon: 10.0,
            heading: 12.0,
            curvature: 5e-4,
        }
    }
}

impl SwathModel {
    pub fn new(width: usize, height: usize, resolution_km: f64) -> Self {
        Self {
            width,
            height,
            resolution_km,
            ..Default::default()
        }
    }

    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.center_lat = lat;
        self.center_lon = lon;
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    /// Move the scene so its center column sits just west of 180°.
    pub fn crossing_anti_meridian(self) -> Self {
        self.with_center(self.center_lat, 179.9)
    }

    /// Ground truth at continuous pixel coordinates.
    pub fn geo_at(&self, x: f64, y: f64) -> GeoPos {
        let dx = (x - self.width as f64 / 2.0) * self.resolution_km;
        let dy = (y - self.height as f64 / 2.0) * self.resolution_km;
        let (sin_h, cos_h) = self.heading.to_radians().sin_cos();

        let east = dx * cos_h - dy * sin_h;
        let north = -dx * sin_h - dy * cos_h + self.curvature * dx * dx;

        let lat = self.center_lat + north / KM_PER_DEG;
        let lon = self.center_lon + east / (KM_PER_DEG * lat.to_radians().cos());
        GeoPos::new(lat, normalize_lon(lon))
    }

    /// Dense raster sampled at pixel centers.
    pub fn dense_raster(&self) -> GeoCodingResult<GeoRaster> {
        let mut lons = Vec::with_capacity(self.width * self.height);
        let mut lats = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let geo = self.geo_at(x as f64 + 0.5, y as f64 + 0.5);
                lons.push(geo.lon);
                lats.push(geo.lat);
            }
        }
        GeoRaster::dense(lons, lats, self.width, self.height, self.resolution_km)
    }

    /// Tie-point raster with one sample every `subsampling` pixels, starting
    /// at the first pixel center. The last tie point lies at or beyond the
    /// last pixel center so the whole scene is covered.
    pub fn tie_point_raster(&self, subsampling: usize) -> GeoCodingResult<GeoRaster> {
        let sub = subsampling.max(1);
        let grid_w = (self.width - 1).div_ceil(sub) + 1;
        let grid_h = (self.height - 1).div_ceil(sub) + 1;

        let mut lons = Vec::with_capacity(grid_w * grid_h);
        let mut lats = Vec::with_capacity(grid_w * grid_h);
        for j in 0..grid_h {
            for i in 0..grid_w {
                let geo = self.geo_at(0.5 + (i * sub) as f64, 0.5 + (j * sub) as f64);
                lons.push(geo.lon);
                lats.push(geo.lat);
            }
        }

        GeoRaster::tie_point(
            lons,
            lats,
            self.width,
            self.height,
            grid_w,
            grid_h,
            0.5,
            0.5,
            sub as f64,
            sub as f64,
            self.resolution_km,
        )
    }
}
