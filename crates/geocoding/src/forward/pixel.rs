//! Forward codings over dense per-pixel geolocation rasters.

use geo_common::{GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use tracing::debug;

use super::{block_bounds, in_scene, lon_window, MAX_WINDOW};
use crate::coding::{require_dense, CodingState, ForwardCoding, ForwardKey};
use crate::util::interpolation::bilinear;
use crate::util::AntiMeridianLonInterpolator;

/// Exact lookup of the geolocation sample covering a pixel.
#[derive(Debug, Default)]
pub struct PixelForward {
    state: CodingState<GeoRaster>,
}

impl PixelForward {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForwardCoding for PixelForward {
    fn key(&self) -> ForwardKey {
        ForwardKey::Pixel
    }

    fn initialize(&mut self, geo_raster: GeoRaster, _contains_anti_meridian: bool) -> GeoCodingResult<()> {
        let name = self.key().as_str();
        self.state.initialize(name, || {
            require_dense(name, &geo_raster)?;
            debug!(
                coding = name,
                width = geo_raster.raster_width(),
                height = geo_raster.raster_height(),
                "initialized"
            );
            Ok(geo_raster)
        })
    }

    fn get_geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos {
        let Some(raster) = self.state.ready() else {
            return GeoPos::invalid();
        };
        if !in_scene(raster, pixel_pos) {
            return GeoPos::invalid();
        }
        // x == width addresses the far edge of the last pixel
        let x = (pixel_pos.x.floor() as usize).min(raster.raster_width() - 1);
        let y = (pixel_pos.y.floor() as usize).min(raster.raster_height() - 1);
        GeoPos::new(raster.lat(x, y), raster.lon(x, y))
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}

#[derive(Debug)]
struct InterpolatingState {
    raster: GeoRaster,
    anti_meridian: bool,
}

/// Bilinear interpolation between the four samples surrounding a pixel.
#[derive(Debug, Default)]
pub struct PixelInterpolatingForward {
    state: CodingState<InterpolatingState>,
}

impl PixelInterpolatingForward {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForwardCoding for PixelInterpolatingForward {
    fn key(&self) -> ForwardKey {
        ForwardKey::PixelInterpolating
    }

    fn initialize(&mut self, geo_raster: GeoRaster, contains_anti_meridian: bool) -> GeoCodingResult<()> {
        let name = self.key().as_str();
        self.state.initialize(name, || {
            require_dense(name, &geo_raster)?;
            debug!(coding = name, anti_meridian = contains_anti_meridian, "initialized");
            Ok(InterpolatingState {
                raster: geo_raster,
                anti_meridian: contains_anti_meridian,
            })
        })
    }

    fn get_geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos {
        let Some(state) = self.state.ready() else {
            return GeoPos::invalid();
        };
        let raster = &state.raster;
        if !in_scene(raster, pixel_pos) {
            return GeoPos::invalid();
        }

        let width = raster.raster_width();
        let height = raster.raster_height();
        let sx = pixel_pos.x - raster.offset_x();
        let sy = pixel_pos.y - raster.offset_y();

        let lat = bilinear(raster.latitudes(), width, height, sx, sy).clamp(-90.0, 90.0);
        let lon = if state.anti_meridian {
            let (x0, x1) = block_bounds(width, sx);
            let (y0, y1) = block_bounds(height, sy);
            let mut buf = [0.0; MAX_WINDOW * MAX_WINDOW];
            let (w, h) = lon_window(raster, (x0, x1), (y0, y1), &mut buf);
            AntiMeridianLonInterpolator::bilinear().interpolate(&buf, w, h, sx - x0 as f64, sy - y0 as f64)
        } else {
            bilinear(raster.longitudes(), width, height, sx, sy)
        };

        GeoPos::new(lat, lon)
    }

    fn dispose(&mut self) {
        self.state.dispose();
    }
}
