//! Spatial-hash inverse over dense rasters.
//!
//! Every raster sample is dropped into a lon/lat bucket whose size follows
//! the nominal resolution. Each bucket remembers the bounding box of the
//! samples that fell into it, so a query only scans that small window.

use std::collections::HashMap;

use geo_common::{GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use tracing::debug;

use super::search::SearchResult;
use super::{finish_match, PoleLookup};
use crate::coding::{require_dense, CodingState, InverseCoding, InverseKey};
use crate::util::{distance_m, lon_diff, resolution_to_degrees, InverseDistanceWeightingInterpolator};

/// Bounding box of the raster samples sharing one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRegion {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

impl RasterRegion {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    pub fn extend(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }
}

/// Buckets per degree for a given nominal resolution.
pub fn bucket_multiplier(resolution_km: f64) -> f64 {
    if resolution_km > 100.0 {
        1.0
    } else if resolution_km > 25.0 {
        4.0
    } else if resolution_km > 10.0 {
        10.0
    } else if resolution_km > 2.0 {
        20.0
    } else if resolution_km > 0.5 {
        50.0
    } else {
        200.0
    }
}

#[inline]
fn bucket_key(lon: f64, lat: f64, multiplier: f64) -> i64 {
    let lon_bucket = ((lon + 180.0) * multiplier).floor() as i64;
    let lat_bucket = ((lat + 90.0) * multiplier).floor() as i64;
    100_000 * lon_bucket + lat_bucket
}

#[derive(Debug)]
struct GeoIndex {
    raster: GeoRaster,
    regions: HashMap<i64, RasterRegion>,
    multiplier: f64,
    /// Acceptance distance in meters.
    epsilon_m: f64,
    poles: PoleLookup,
    refine: Option<InverseDistanceWeightingInterpolator>,
}

impl GeoIndex {
    fn build(raster: GeoRaster, poles: &[PixelPos], fraction_accuracy: bool) -> Self {
        let multiplier = bucket_multiplier(raster.resolution_km());
        let mut regions: HashMap<i64, RasterRegion> = HashMap::new();

        for y in 0..raster.raster_height() {
            for x in 0..raster.raster_width() {
                let lon = raster.lon(x, y);
                let lat = raster.lat(x, y);
                if lon.is_nan() || lat.is_nan() {
                    continue;
                }
                regions
                    .entry(bucket_key(lon, lat, multiplier))
                    .and_modify(|r| r.extend(x, y))
                    .or_insert_with(|| RasterRegion::new(x, y));
            }
        }

        let epsilon_m = raster.resolution_km() * 1000.0 / std::f64::consts::SQRT_2;
        let pole_eps = 2.0 * resolution_to_degrees(raster.resolution_km());
        Self {
            poles: PoleLookup::new(poles, pole_eps),
            refine: fraction_accuracy.then(InverseDistanceWeightingInterpolator::default),
            raster,
            regions,
            multiplier,
            epsilon_m,
        }
    }

    fn pixel_pos(&self, geo: &GeoPos) -> PixelPos {
        // Bucket keys are only defined for wrapped longitudes
        if !geo.is_valid() || !(-180.0..=180.0).contains(&geo.lon) {
            return PixelPos::invalid();
        }
        if let Some(pole) = self.poles.find(&self.raster, geo) {
            return pole;
        }

        let Some(region) = self.regions.get(&bucket_key(geo.lon, geo.lat, self.multiplier)) else {
            return PixelPos::invalid();
        };

        let raster = &self.raster;
        let (x, y) = if region.is_point() {
            (region.min_x, region.min_y)
        } else {
            let x_min = region.min_x.saturating_sub(1);
            let y_min = region.min_y.saturating_sub(1);
            let x_max = (region.max_x + 1).min(raster.raster_width() - 1);
            let y_max = (region.max_y + 1).min(raster.raster_height() - 1);

            let mut best = SearchResult::new();
            for j in y_min..=y_max {
                for i in x_min..=x_max {
                    let d_lat = raster.lat(i, j) - geo.lat;
                    let d_lon = lon_diff(raster.lon(i, j), geo.lon);
                    best.update(i, j, d_lat * d_lat + d_lon * d_lon);
                }
            }
            if !best.is_found() {
                return PixelPos::invalid();
            }
            (best.x, best.y)
        };

        let distance = distance_m(raster.lon(x, y), raster.lat(x, y), geo.lon, geo.lat);
        if !(distance < self.epsilon_m) {
            return PixelPos::invalid();
        }
        finish_match(raster, geo, x, y, self.refine.as_ref())
    }
}

/// Inverse coding backed by a bucketed spatial index.
#[derive(Debug)]
pub struct PixelGeoIndexInverse {
    fraction_accuracy: bool,
    state: CodingState<GeoIndex>,
}

impl PixelGeoIndexInverse {
    /// `fraction_accuracy` refines matches with inverse distance weighting.
    pub fn new(fraction_accuracy: bool) -> Self {
        Self {
            fraction_accuracy,
            state: CodingState::Uninitialized,
        }
    }

    /// Number of occupied buckets, `None` before initialization.
    pub fn bucket_count(&self) -> Option<usize> {
        self.state.ready().map(|index| index.regions.len())
    }
}

impl InverseCoding for PixelGeoIndexInverse {
    fn key(&self) -> InverseKey {
        if self.fraction_accuracy {
            InverseKey::PixelGeoIndexInterpolating
        } else {
            InverseKey::PixelGeoIndex
        }
    }

    fn initialize(
        &mut self,
        geo_raster: GeoRaster,
        _contains_anti_meridian: bool,
        pole_locations: &[PixelPos],
    ) -> GeoCodingResult<()> {
        let name = self.key().as_str();
        let fraction_accuracy = self.fraction_accuracy;
        self.state.initialize(name, || {
            require_dense(name, &geo_raster)?;
            let index = GeoIndex::build(geo_raster, pole_locations, fraction_accuracy);
            debug!(
                coding = name,
                buckets = index.regions.len(),
                multiplier = index.multiplier,
                epsilon_m = index.epsilon_m,
                poles = index.poles.len(),
                "built geo index"
            );
            Ok(index)
        })
    }

    fn get_pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos {
        match self.state.ready() {
            Some(index) => index.pixel_pos(geo_pos),
            None => PixelPos::invalid(),
        }
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 20x10 raster, 0.01° spacing (about 1.1 km), rows running south.
    fn raster() -> GeoRaster {
        let (w, h) = (20, 10);
        let mut lons = Vec::new();
        let mut lats = Vec::new();
        for y in 0..h {
            for x in 0..w {
                lons.push(5.0 + x as f64 * 0.01);
                lats.push(45.0 - y as f64 * 0.01);
            }
        }
        GeoRaster::dense(lons, lats, w, h, 1.1).unwrap()
    }

    #[test]
    fn test_bucket_multiplier_steps() {
        assert_eq!(bucket_multiplier(300.0), 1.0);
        assert_eq!(bucket_multiplier(30.0), 4.0);
        assert_eq!(bucket_multiplier(11.0), 10.0);
        assert_eq!(bucket_multiplier(5.0), 20.0);
        assert_eq!(bucket_multiplier(1.1), 50.0);
        assert_eq!(bucket_multiplier(0.3), 200.0);
    }

    #[test]
    fn test_bucket_key() {
        assert_eq!(bucket_key(-180.0, -90.0, 1.0), 0);
        assert_eq!(bucket_key(0.5, 0.5, 1.0), 100_000 * 180 + 90);
    }

    #[test]
    fn test_region_extend() {
        let mut r = RasterRegion::new(4, 4);
        assert!(r.is_point());
        r.extend(2, 6);
        assert_eq!((r.min_x, r.max_x, r.min_y, r.max_y), (2, 4, 4, 6));
        assert!(!r.is_point());
    }

    #[test]
    fn test_finds_sample_centers() {
        let raster = raster();
        let mut inv = PixelGeoIndexInverse::new(false);
        inv.initialize(raster.clone(), false, &[]).unwrap();
        assert!(inv.bucket_count().unwrap() > 0);

        for &(x, y) in &[(0, 0), (7, 3), (19, 9), (12, 5)] {
            let geo = GeoPos::new(raster.lat(x, y), raster.lon(x, y));
            let p = inv.get_pixel_pos(&geo);
            assert_eq!(p, PixelPos::new(x as f64 + 0.5, y as f64 + 0.5), "sample ({x}, {y})");
        }
    }

    #[test]
    fn test_far_query_is_invalid() {
        let mut inv = PixelGeoIndexInverse::new(false);
        inv.initialize(raster(), false, &[]).unwrap();
        assert!(!inv.get_pixel_pos(&GeoPos::new(10.0, 10.0)).is_valid());
        assert!(!inv.get_pixel_pos(&GeoPos::invalid()).is_valid());
    }

    #[test]
    fn test_unwrapped_longitude_is_invalid() {
        let mut inv = PixelGeoIndexInverse::new(false);
        inv.initialize(raster(), false, &[]).unwrap();
        for lon in [1e300, -1e300, f64::INFINITY, f64::NEG_INFINITY, 365.05] {
            assert!(!inv.get_pixel_pos(&GeoPos::new(45.0, lon)).is_valid(), "lon {lon}");
        }
        assert!(inv.get_pixel_pos(&GeoPos::new(45.0, 5.05)).is_valid());
    }

    #[test]
    fn test_interpolating_key() {
        assert_eq!(PixelGeoIndexInverse::new(true).key(), InverseKey::PixelGeoIndexInterpolating);
        assert_eq!(PixelGeoIndexInverse::new(false).key(), InverseKey::PixelGeoIndex);
    }
}
