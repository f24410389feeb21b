//! Tiled polynomial inverse over tie-point grids.
//!
//! The grid is cut into tiles that share their border tie points. Each tile
//! gets an [`Approximation`] fitted to its tie points; a query picks the
//! tile whose center is closest (and within its trust radius) and evaluates
//! that tile's polynomials.
//!
//! Grids crossing the antimeridian are first unwrapped line by line so the
//! longitudes are continuous, which may push them outside [-180, 180].
//! Queries are mapped into the same frame before the tile lookup.

use geo_common::{GeoCodingError, GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::approximation::{Approximation, WarpPoint};
use crate::coding::{CodingState, InverseCoding, InverseKey};

/// Minimum number of tie points per tile.
const MIN_POINTS_PER_TILE: usize = 10;

/// Margin in degrees added around the normalized longitude range.
const LON_MARGIN: f64 = 1e-3;

/// Fit error in pixels above which a tile is reported.
const RMSE_WARN_LIMIT: f64 = 0.5;

/// Geographic extent of the normalized grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundaries {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    /// Longitudes in [`overlap_start`, `overlap_end`] are also tried shifted by 360°.
    pub overlap_start: f64,
    pub overlap_end: f64,
}

impl Boundaries {
    /// Extent of normalized longitudes and latitudes, ignoring NaN samples.
    pub fn from_samples(lons: &[f64], lats: &[f64]) -> Self {
        let (mut lon_min, mut lon_max) = min_max(lons);
        let (lat_min, lat_max) = min_max(lats);
        lon_min -= LON_MARGIN;
        lon_max += LON_MARGIN;

        let overlap_start = if lon_min < -180.0 { lon_min + 360.0 } else { lon_min };
        let overlap_end = if lon_max > 180.0 { lon_max - 360.0 } else { lon_max };

        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
            overlap_start,
            overlap_end,
        }
    }

    /// Latitude if inside [-90, 90], NaN otherwise.
    pub fn normalize_lat(lat: f64) -> f64 {
        if (-90.0..=90.0).contains(&lat) {
            lat
        } else {
            f64::NAN
        }
    }

    /// Map a longitude into the normalized frame of the grid.
    ///
    /// NaN if the longitude is outside [-180, 180] or outside the grid's
    /// longitude range after shifting.
    pub fn normalize_lon(&self, lon: f64) -> f64 {
        if !(-180.0..=180.0).contains(&lon) {
            return f64::NAN;
        }
        let mut normalized = lon;
        if normalized < self.lon_min {
            normalized += 360.0;
        }
        if normalized < self.lon_min || normalized > self.lon_max {
            return f64::NAN;
        }
        normalized
    }

    pub fn in_overlap(&self, lon: f64) -> bool {
        lon >= self.overlap_start && lon <= self.overlap_end
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Unwrap longitude jumps of more than 180° line by line.
///
/// Each point is compared with its left neighbour, the first point of a
/// line with the first point of the line above. Returns the normalized
/// longitudes and the (west, east) normalization flags.
pub fn normalize_longitudes(lons: &[f64], width: usize, height: usize) -> (Vec<f64>, bool, bool) {
    let mut normalized = lons.to_vec();
    let mut west = false;
    let mut east = false;

    for y in 0..height {
        for x in 0..width {
            if x == 0 && y == 0 {
                continue;
            }
            let index = y * width + x;
            let base = if x == 0 {
                normalized[index - width]
            } else {
                normalized[index - 1]
            };
            let delta = normalized[index] - base;
            if delta > 180.0 {
                normalized[index] -= 360.0;
                west = true;
            } else if delta < -180.0 {
                normalized[index] += 360.0;
                east = true;
            }
        }
    }

    // West normalization can reach -540°
    if west {
        for lon in &mut normalized {
            *lon += 360.0;
        }
    }
    (normalized, west, east)
}

/// Split `n` tiles into a `(columns, rows)` layout matching the aspect
/// ratio `a / b`.
pub fn fit_dimension(n: usize, a: f64, b: f64) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let w = ((n as f64 * a / b).sqrt().round() as usize).max(1);
    let h = ((n as f64 / w as f64).round() as usize).max(1);
    (w, h)
}

/// Choose the tile layout `(columns, rows)` for a `grid_width` x
/// `grid_height` tie-point grid covering a scene of the given size.
///
/// Starts from one tile per ten tie points and shrinks the count until
/// every tile holds at least ten points. Each tile spans at least two tie
/// points per axis.
pub fn fit_tile_layout(grid_width: usize, grid_height: usize, scene_width: f64, scene_height: f64) -> (usize, usize) {
    let num_points = grid_width * grid_height;
    let mut num_tiles = num_points.div_ceil(MIN_POINTS_PER_TILE).max(1);
    loop {
        let (ti, tj) = fit_dimension(num_tiles, scene_width, scene_height);
        let ti = ti.min(grid_width.saturating_sub(1)).max(1);
        let tj = tj.min(grid_height.saturating_sub(1)).max(1);
        if num_tiles == 1 || num_points / (ti * tj) >= MIN_POINTS_PER_TILE {
            return (ti, tj);
        }
        num_tiles -= 1;
    }
}

/// Inclusive tie-point range of tile `k` out of `tiles` along an axis of `n` points.
fn tile_span(n: usize, tiles: usize, k: usize) -> (usize, usize) {
    let last = n - 1;
    (k * last / tiles, (k + 1) * last / tiles)
}

/// Steps and counts `(step_i, step_j, num_u, num_v)` that sample a
/// `width` x `height` tile with at most about `max_points` warp points.
///
/// The last row and column of the tile are always sampled, so the counts
/// may exceed `width / step_i` and `height / step_j`.
pub fn determine_warp_parameters(width: usize, height: usize, max_points: usize) -> (usize, usize, usize, usize) {
    let mut num_u = width;
    let mut num_v = height;
    let mut step_i = 1;
    let mut step_j = 1;

    let mut adjust_i = true;
    while num_u * num_v > max_points {
        if adjust_i {
            step_i += 1;
            num_u = width / step_i;
        } else {
            step_j += 1;
            num_v = height / step_j;
        }
        adjust_i = !adjust_i;
    }
    num_u = num_u.max(1);
    num_v = num_v.max(1);

    // Reach the right and bottom borders; indices past them are clamped
    if (num_u - 1) * step_i < width.saturating_sub(1) {
        num_u = (width - 1).div_ceil(step_i) + 1;
    }
    if (num_v - 1) * step_j < height.saturating_sub(1) {
        num_v = (height - 1).div_ceil(step_j) + 1;
    }
    (step_i, step_j, num_u, num_v)
}

#[derive(Debug, Clone, Copy)]
struct Tile {
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

fn collect_warp_points(raster: &GeoRaster, lons: &[f64], tile: Tile, max_points: usize) -> Vec<WarpPoint> {
    let width = raster.raster_width();
    let sw = tile.i2 - tile.i1 + 1;
    let sh = tile.j2 - tile.j1 + 1;
    let (step_i, step_j, num_u, num_v) = determine_warp_parameters(sw, sh, max_points);

    let mut points = Vec::with_capacity(num_u * num_v);
    for v in 0..num_v {
        let j = (tile.j1 + v * step_j).min(tile.j2);
        for u in 0..num_u {
            let i = (tile.i1 + u * step_i).min(tile.i2);
            let index = j * width + i;
            let lat = raster.latitudes()[index];
            let lon = lons[index];
            if lat.is_nan() || lon.is_nan() {
                continue;
            }
            points.push(WarpPoint {
                lat,
                lon,
                x: raster.offset_x() + i as f64 * raster.subsampling_x(),
                y: raster.offset_y() + j as f64 * raster.subsampling_y(),
            });
        }
    }
    points
}

#[derive(Debug)]
struct TiledApproximations {
    boundaries: Boundaries,
    approximations: Vec<Approximation>,
    scene_width: f64,
    scene_height: f64,
}

impl TiledApproximations {
    fn build(raster: &GeoRaster, contains_anti_meridian: bool, max_points: usize) -> GeoCodingResult<Self> {
        let width = raster.raster_width();
        let height = raster.raster_height();

        let (lons, west, east) = if contains_anti_meridian {
            normalize_longitudes(raster.longitudes(), width, height)
        } else {
            (raster.longitudes().to_vec(), false, false)
        };
        let boundaries = Boundaries::from_samples(&lons, raster.latitudes());
        if !boundaries.lon_min.is_finite() || !boundaries.lat_min.is_finite() {
            return Err(GeoCodingError::invalid_raster("tie-point grid holds no valid samples"));
        }

        let scene_width = raster.scene_width() as f64;
        let scene_height = raster.scene_height() as f64;
        let (tiles_i, tiles_j) = fit_tile_layout(width, height, scene_width, scene_height);
        let tiles: Vec<Tile> = (0..tiles_j)
            .flat_map(|tj| (0..tiles_i).map(move |ti| (ti, tj)))
            .map(|(ti, tj)| {
                let (i1, i2) = tile_span(width, tiles_i, ti);
                let (j1, j2) = tile_span(height, tiles_j, tj);
                Tile { i1, i2, j1, j2 }
            })
            .collect();

        let approximations = tiles
            .par_iter()
            .enumerate()
            .map(|(k, &tile)| {
                let points = collect_warp_points(raster, &lons, tile, max_points);
                let approximation = Approximation::fit(k, &points)?;
                let (rmse_x, rmse_y) = approximation.rmse();
                let family_x = approximation.f_x().family().name;
                let family_y = approximation.f_y().family().name;
                if rmse_x > RMSE_WARN_LIMIT || rmse_y > RMSE_WARN_LIMIT {
                    warn!(tile = k, rmse_x, rmse_y, family_x, family_y, "tile approximation exceeds half a pixel");
                } else {
                    debug!(tile = k, points = points.len(), family_x, family_y, rmse_x, rmse_y, "fitted tile");
                }
                Ok(approximation)
            })
            .collect::<GeoCodingResult<Vec<_>>>()?;

        debug!(
            west_normalized = west,
            east_normalized = east,
            lon_min = boundaries.lon_min,
            lon_max = boundaries.lon_max,
            lat_min = boundaries.lat_min,
            lat_max = boundaries.lat_max,
            tiles_i,
            tiles_j,
            "fitted tie-point approximations"
        );

        Ok(Self {
            boundaries,
            approximations,
            scene_width,
            scene_height,
        })
    }

    /// Closest approximation trusting (`lat`, `lon`) and its squared distance.
    fn best_approximation(&self, lat: f64, lon: f64) -> Option<(&Approximation, f64)> {
        let mut best: Option<(&Approximation, f64)> = None;
        for a in &self.approximations {
            let d = a.square_distance(lat, lon);
            if d < a.max_square_distance() && best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((a, d));
            }
        }
        best
    }

    fn pixel_pos(&self, geo: &GeoPos) -> PixelPos {
        let lat = Boundaries::normalize_lat(geo.lat);
        let lon = self.boundaries.normalize_lon(geo.lon);
        if lat.is_nan() || lon.is_nan() {
            return PixelPos::invalid();
        }

        let mut candidate = self.best_approximation(lat, lon).map(|(a, d)| (a, lon, d));
        if self.boundaries.in_overlap(lon) {
            let shifted = lon + 360.0;
            if let Some((a, d)) = self.best_approximation(lat, shifted) {
                if candidate.map_or(true, |(_, _, best_d)| d < best_d) {
                    candidate = Some((a, shifted, d));
                }
            }
        }

        let Some((approximation, lon, _)) = candidate else {
            return PixelPos::invalid();
        };
        let pixel = approximation.pixel_pos(lat, lon);
        if pixel.x < 0.0 || pixel.y < 0.0 || pixel.x > self.scene_width || pixel.y > self.scene_height {
            return PixelPos::invalid();
        }
        pixel
    }
}

/// Inverse coding for tie-point grids using tiled polynomial approximations.
#[derive(Debug)]
pub struct TiePointInverse {
    max_points_per_tile: usize,
    state: CodingState<TiledApproximations>,
}

impl Default for TiePointInverse {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl TiePointInverse {
    /// `max_points_per_tile` bounds the warp points used to fit each tile.
    pub fn new(max_points_per_tile: usize) -> Self {
        Self {
            max_points_per_tile: max_points_per_tile.max(MIN_POINTS_PER_TILE),
            state: CodingState::Uninitialized,
        }
    }

    /// Fitted approximations, empty before initialization.
    pub fn approximations(&self) -> &[Approximation] {
        self.state
            .ready()
            .map(|t| t.approximations.as_slice())
            .unwrap_or(&[])
    }

    pub fn boundaries(&self) -> Option<Boundaries> {
        self.state.ready().map(|t| t.boundaries)
    }
}

impl InverseCoding for TiePointInverse {
    fn key(&self) -> InverseKey {
        InverseKey::TiePoint
    }

    fn initialize(
        &mut self,
        geo_raster: GeoRaster,
        contains_anti_meridian: bool,
        _pole_locations: &[PixelPos],
    ) -> GeoCodingResult<()> {
        let name = self.key().as_str();
        let max_points = self.max_points_per_tile;
        self.state.initialize(name, || {
            if geo_raster.raster_width() < 2 || geo_raster.raster_height() < 2 {
                return Err(GeoCodingError::unsupported_raster(
                    name,
                    format!(
                        "tie-point grid must be at least 2x2, got {}x{}",
                        geo_raster.raster_width(),
                        geo_raster.raster_height()
                    ),
                ));
            }
            let tiled = TiledApproximations::build(&geo_raster, contains_anti_meridian, max_points)?;
            debug!(coding = name, approximations = tiled.approximations.len(), "initialized");
            Ok(tiled)
        })
    }

    fn get_pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos {
        match self.state.ready() {
            Some(tiled) => tiled.pixel_pos(geo_pos),
            None => PixelPos::invalid(),
        }
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}
