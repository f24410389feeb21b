//! Forward codings over subsampled tie-point grids.
//!
//! Pixel coordinates map to fractional grid coordinates through
//! `(pixel - offset) / subsampling`. Latitudes are interpolated over the
//! whole grid; longitudes go through [`AntiMeridianLonInterpolator`] on the
//! window of tie points the kernel touches.

use geo_common::{GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use tracing::debug;

use super::{block_bounds, in_scene, lon_window, MAX_WINDOW};
use crate::coding::{CodingState, ForwardCoding, ForwardKey};
use crate::util::interpolation::{bicubic, bilinear};
use crate::util::{AntiMeridianLonInterpolator, LonInterpolation};

/// Shared state of both tie-point forwards.
#[derive(Debug)]
struct TiePointGrid {
    raster: GeoRaster,
    interpolator: AntiMeridianLonInterpolator,
}

impl TiePointGrid {
    fn grid_coords(&self, pixel_pos: &PixelPos) -> (f64, f64) {
        let r = &self.raster;
        (
            (pixel_pos.x - r.offset_x()) / r.subsampling_x(),
            (pixel_pos.y - r.offset_y()) / r.subsampling_y(),
        )
    }

    fn geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos {
        let r = &self.raster;
        if !in_scene(r, pixel_pos) {
            return GeoPos::invalid();
        }
        let (tx, ty) = self.grid_coords(pixel_pos);
        let width = r.raster_width();
        let height = r.raster_height();

        let ((x0, x1), (y0, y1), lat) = match self.interpolator.method() {
            LonInterpolation::Bilinear => (
                block_bounds(width, tx),
                block_bounds(height, ty),
                bilinear(r.latitudes(), width, height, tx, ty),
            ),
            LonInterpolation::Cubic => (
                cubic_bounds(width, tx),
                cubic_bounds(height, ty),
                bicubic(r.latitudes(), width, height, tx, ty),
            ),
        };

        let mut buf = [0.0; MAX_WINDOW * MAX_WINDOW];
        let (w, h) = lon_window(r, (x0, x1), (y0, y1), &mut buf);
        let lon = self
            .interpolator
            .interpolate(&buf, w, h, tx - x0 as f64, ty - y0 as f64);

        GeoPos::new(lat.clamp(-90.0, 90.0), lon)
    }
}

/// Grid nodes `i0 - 1 ..= i0 + 2` of the cubic kernel, clamped to `0..n`.
#[inline]
fn cubic_bounds(n: usize, t: f64) -> (usize, usize) {
    let (i0, _) = block_bounds(n, t);
    (i0.saturating_sub(1), (i0 + 2).min(n - 1))
}

fn initialize_grid(
    state: &mut CodingState<TiePointGrid>,
    key: ForwardKey,
    method: LonInterpolation,
    geo_raster: GeoRaster,
    contains_anti_meridian: bool,
) -> GeoCodingResult<()> {
    state.initialize(key.as_str(), || {
        debug!(
            coding = key.as_str(),
            grid_width = geo_raster.raster_width(),
            grid_height = geo_raster.raster_height(),
            subsampling_x = geo_raster.subsampling_x(),
            subsampling_y = geo_raster.subsampling_y(),
            anti_meridian = contains_anti_meridian,
            "initialized"
        );
        Ok(TiePointGrid {
            raster: geo_raster,
            interpolator: AntiMeridianLonInterpolator::new(method),
        })
    })
}

/// Bilinear interpolation between the four surrounding tie points.
#[derive(Debug, Default)]
pub struct TiePointBilinearForward {
    state: CodingState<TiePointGrid>,
}

impl TiePointBilinearForward {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForwardCoding for TiePointBilinearForward {
    fn key(&self) -> ForwardKey {
        ForwardKey::TiePointBilinear
    }

    fn initialize(&mut self, geo_raster: GeoRaster, contains_anti_meridian: bool) -> GeoCodingResult<()> {
        initialize_grid(
            &mut self.state,
            ForwardKey::TiePointBilinear,
            LonInterpolation::Bilinear,
            geo_raster,
            contains_anti_meridian,
        )
    }

    fn get_geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos {
        match self.state.ready() {
            Some(grid) => grid.geo_pos(pixel_pos),
            None => GeoPos::invalid(),
        }
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}

/// Cubic convolution over the 4x4 tie-point neighbourhood.
#[derive(Debug, Default)]
pub struct TiePointSplineForward {
    state: CodingState<TiePointGrid>,
}

impl TiePointSplineForward {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForwardCoding for TiePointSplineForward {
    fn key(&self) -> ForwardKey {
        ForwardKey::TiePointSpline
    }

    fn initialize(&mut self, geo_raster: GeoRaster, contains_anti_meridian: bool) -> GeoCodingResult<()> {
        initialize_grid(
            &mut self.state,
            ForwardKey::TiePointSpline,
            LonInterpolation::Cubic,
            geo_raster,
            contains_anti_meridian,
        )
    }

    fn get_geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos {
        match self.state.ready() {
            Some(grid) => grid.geo_pos(pixel_pos),
            None => GeoPos::invalid(),
        }
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}
