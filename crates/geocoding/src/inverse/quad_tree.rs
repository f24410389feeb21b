//! Quad-tree search inverse over dense rasters.
//!
//! No index is kept: each query descends from the full raster extent,
//! discarding every sub-rectangle whose corner bounding box (grown by
//! `epsilon`) does not contain the query. Quadrants with a NaN corner are
//! never discarded. All surviving quadrants are visited, so the closest
//! sample wins rather than the first one found.

use geo_common::{GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use tracing::debug;

use super::search::SearchResult;
use super::{finish_match, PoleLookup};
use crate::coding::{require_dense, CodingState, InverseCoding, InverseKey};
use crate::util::{lon_diff, resolution_to_degrees, InverseDistanceWeightingInterpolator};

#[derive(Debug)]
struct QuadTree {
    raster: GeoRaster,
    anti_meridian: bool,
    /// Search tolerance in degrees.
    epsilon: f64,
    poles: PoleLookup,
    refine: Option<InverseDistanceWeightingInterpolator>,
}

/// Longitude bounds of a quad whose corners straddle the seam, keeping only
/// the side of the query.
fn one_sided_lon_bounds(corners: &[f64; 4], query_lon: f64) -> (f64, f64) {
    if query_lon > 0.0 {
        let min = corners
            .iter()
            .copied()
            .filter(|&lon| lon >= 0.0)
            .fold(180.0, f64::min);
        (min, 180.0)
    } else {
        let max = corners
            .iter()
            .copied()
            .filter(|&lon| lon < 0.0)
            .fold(-180.0, f64::max);
        (-180.0, max)
    }
}

impl QuadTree {
    fn pixel_pos(&self, geo: &GeoPos) -> PixelPos {
        if !geo.is_valid() {
            return PixelPos::invalid();
        }
        if let Some(pole) = self.poles.find(&self.raster, geo) {
            return pole;
        }

        let raster = &self.raster;
        let mut result = SearchResult::new();
        let found = self.search(geo, 0, 0, raster.raster_width(), raster.raster_height(), &mut result);
        if !found {
            return PixelPos::invalid();
        }

        let (x, y) = (result.x, result.y);
        let d_lat = (raster.lat(x, y) - geo.lat).abs();
        let d_lon = geo.lat.to_radians().cos() * lon_diff(raster.lon(x, y), geo.lon);
        if !(d_lat < self.epsilon && d_lon < self.epsilon) {
            return PixelPos::invalid();
        }
        finish_match(raster, geo, x, y, self.refine.as_ref())
    }

    /// Whether the corner bounding box, grown by the tolerance, holds `geo`.
    ///
    /// Longitude grows by `epsilon / cos(lat)` to match the metric the final
    /// acceptance test uses.
    fn bounds_contain(&self, geo: &GeoPos, lats: &[f64; 4], lons: &[f64; 4]) -> bool {
        let eps = self.epsilon;
        let lon_eps = (eps / geo.lat.to_radians().cos()).min(180.0);

        let lat_min = lats.iter().copied().fold(f64::INFINITY, f64::min) - eps;
        let lat_max = lats.iter().copied().fold(f64::NEG_INFINITY, f64::max) + eps;
        let raw_lon_min = lons.iter().copied().fold(f64::INFINITY, f64::min);
        let raw_lon_max = lons.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (lon_min, lon_max) = if self.anti_meridian && (raw_lon_max - raw_lon_min).abs() > 180.0 {
            let (min, max) = one_sided_lon_bounds(lons, geo.lon);
            (min - lon_eps, max + lon_eps)
        } else {
            (raw_lon_min - lon_eps, raw_lon_max + lon_eps)
        };

        geo.lat >= lat_min && geo.lat <= lat_max && geo.lon >= lon_min && geo.lon <= lon_max
    }

    /// Search the `w` x `h` rectangle at (`x`, `y`). Returns true if any
    /// sample inside improved `result`.
    fn search(&self, geo: &GeoPos, x: usize, y: usize, w: usize, h: usize, result: &mut SearchResult) -> bool {
        if w < 2 || h < 2 {
            return false;
        }
        let raster = &self.raster;
        let (x1, x2) = (x, x + w - 1);
        let (y1, y2) = (y, y + h - 1);
        let corners = [(x1, y1), (x1, y2), (x2, y1), (x2, y2)];
        let lats = corners.map(|(i, j)| raster.lat(i, j));
        let lons = corners.map(|(i, j)| raster.lon(i, j));

        // NaN corners bound nothing; keep descending
        let has_nan = lats.iter().chain(lons.iter()).any(|v| v.is_nan());
        if !has_nan && !self.bounds_contain(geo, &lats, &lons) {
            return false;
        }

        if w == 2 && h == 2 {
            let cos_lat = geo.lat.to_radians().cos();
            let mut found = false;
            for k in 0..4 {
                let d_lat = geo.lat - lats[k];
                let d_lon = cos_lat * lon_diff(geo.lon, lons[k]);
                if result.update(corners[k].0, corners[k].1, d_lat * d_lat + d_lon * d_lon) {
                    found = true;
                }
            }
            return found;
        }

        let w2 = w >> 1;
        let h2 = h >> 1;
        let i2 = x + w2;
        let j2 = y + h2;
        let w2r = w - w2;
        let h2r = h - h2;
        let w2 = w2.max(2);
        let h2 = h2.max(2);

        let b1 = self.search(geo, x, y, w2, h2, result);
        let b2 = self.search(geo, x, j2, w2, h2r, result);
        let b3 = self.search(geo, i2, y, w2r, h2, result);
        let b4 = self.search(geo, i2, j2, w2r, h2r, result);
        b1 || b2 || b3 || b4
    }
}

/// Inverse coding by recursive quad-tree search.
#[derive(Debug)]
pub struct PixelQuadTreeInverse {
    fraction_accuracy: bool,
    state: CodingState<QuadTree>,
}

impl PixelQuadTreeInverse {
    /// `fraction_accuracy` refines matches with inverse distance weighting.
    pub fn new(fraction_accuracy: bool) -> Self {
        Self {
            fraction_accuracy,
            state: CodingState::Uninitialized,
        }
    }

    /// Search tolerance in degrees, `None` before initialization.
    pub fn epsilon(&self) -> Option<f64> {
        self.state.ready().map(|tree| tree.epsilon)
    }
}

impl InverseCoding for PixelQuadTreeInverse {
    fn key(&self) -> InverseKey {
        if self.fraction_accuracy {
            InverseKey::PixelQuadTreeInterpolating
        } else {
            InverseKey::PixelQuadTree
        }
    }

    fn initialize(
        &mut self,
        geo_raster: GeoRaster,
        contains_anti_meridian: bool,
        pole_locations: &[PixelPos],
    ) -> GeoCodingResult<()> {
        let name = self.key().as_str();
        let fraction_accuracy = self.fraction_accuracy;
        self.state.initialize(name, || {
            require_dense(name, &geo_raster)?;
            // Angular resolution, doubled as a safety margin
            let epsilon = 2.0 * resolution_to_degrees(geo_raster.resolution_km());
            debug!(
                coding = name,
                epsilon,
                anti_meridian = contains_anti_meridian,
                poles = pole_locations.len(),
                "initialized"
            );
            Ok(QuadTree {
                raster: geo_raster,
                anti_meridian: contains_anti_meridian,
                epsilon,
                poles: PoleLookup::new(pole_locations, epsilon),
                refine: fraction_accuracy.then(InverseDistanceWeightingInterpolator::default),
            })
        })
    }

    fn get_pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos {
        match self.state.ready() {
            Some(tree) => tree.pixel_pos(geo_pos),
            None => PixelPos::invalid(),
        }
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}
