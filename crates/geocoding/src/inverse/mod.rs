//! Inverse codings: geographic position to pixel.
//!
//! Dense rasters are searched directly, either through a bucketed spatial
//! index built once ([`PixelGeoIndexInverse`]) or by a recursive quad-tree
//! descent at query time ([`PixelQuadTreeInverse`]). Tie-point grids are
//! inverted by per-tile polynomial approximations ([`TiePointInverse`]).

mod approximation;
mod geo_index;
mod quad_tree;
mod search;
mod tie_point;

pub use approximation::Approximation;
pub use geo_index::{bucket_multiplier, PixelGeoIndexInverse, RasterRegion};
pub use quad_tree::PixelQuadTreeInverse;
pub use search::SearchResult;
pub use tie_point::{determine_warp_parameters, fit_tile_layout, Boundaries, TiePointInverse};

use geo_common::{GeoPos, GeoRaster, PixelPos};

use crate::util::InverseDistanceWeightingInterpolator;

/// Known pole positions of a dense raster.
#[derive(Debug, Clone, Default)]
pub(crate) struct PoleLookup {
    poles: Vec<PixelPos>,
    /// Latitude distance from ±90° within which queries snap to a pole.
    epsilon_deg: f64,
}

impl PoleLookup {
    pub(crate) fn new(poles: &[PixelPos], epsilon_deg: f64) -> Self {
        Self {
            poles: poles.to_vec(),
            epsilon_deg,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.poles.len()
    }

    /// The pole matching `geo`, if `geo` is that close to a pole.
    ///
    /// The pole is chosen by the hemisphere of the raster latitude at its
    /// pixel position.
    pub(crate) fn find(&self, raster: &GeoRaster, geo: &GeoPos) -> Option<PixelPos> {
        if self.poles.is_empty() || geo.lat.abs() < 90.0 - self.epsilon_deg {
            return None;
        }
        let north = geo.lat > 0.0;
        self.poles.iter().copied().find(|pole| {
            let x = sample_index(pole.x - raster.offset_x(), raster.raster_width());
            let y = sample_index(pole.y - raster.offset_y(), raster.raster_height());
            let lat = raster.lat(x, y);
            !lat.is_nan() && (lat > 0.0) == north
        })
    }
}

#[inline]
fn sample_index(coord: f64, n: usize) -> usize {
    (coord.floor().max(0.0) as usize).min(n - 1)
}

/// Turn an accepted integer match into a pixel position.
pub(crate) fn finish_match(
    raster: &GeoRaster,
    geo: &GeoPos,
    x: usize,
    y: usize,
    refine: Option<&InverseDistanceWeightingInterpolator>,
) -> PixelPos {
    let (fx, fy) = match refine {
        Some(idw) => idw.interpolate(raster, geo, x, y),
        None => (x as f64, y as f64),
    };
    PixelPos::new(fx + raster.offset_x(), fy + raster.offset_y())
}
