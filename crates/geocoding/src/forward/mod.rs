//! Forward codings: pixel to geographic position.
//!
//! | Coding                      | Raster    | Method                         |
//! |-----------------------------|-----------|--------------------------------|
//! | `PixelForward`              | dense     | sample lookup                  |
//! | `PixelInterpolatingForward` | dense     | bilinear                       |
//! | `TiePointBilinearForward`   | tie-point | bilinear + seam-safe longitude |
//! | `TiePointSplineForward`     | tie-point | cubic + seam-safe longitude    |

mod pixel;
mod tie_point;

pub use pixel::{PixelForward, PixelInterpolatingForward};
pub use tie_point::{TiePointBilinearForward, TiePointSplineForward};

use geo_common::{GeoRaster, PixelPos};

/// True if `pixel_pos` is a number inside `[0, scene_width] x [0, scene_height]`.
#[inline]
pub(crate) fn in_scene(raster: &GeoRaster, pixel_pos: &PixelPos) -> bool {
    pixel_pos.is_valid()
        && pixel_pos.x >= 0.0
        && pixel_pos.y >= 0.0
        && pixel_pos.x <= raster.scene_width() as f64
        && pixel_pos.y <= raster.scene_height() as f64
}

/// Largest window handed to the longitude interpolator.
pub(crate) const MAX_WINDOW: usize = 4;

/// Copy the longitudes of raster columns `x0..=x1`, rows `y0..=y1` into `buf`.
///
/// Returns the window width and height.
pub(crate) fn lon_window(
    raster: &GeoRaster,
    (x0, x1): (usize, usize),
    (y0, y1): (usize, usize),
    buf: &mut [f64; MAX_WINDOW * MAX_WINDOW],
) -> (usize, usize) {
    let width = x1 - x0 + 1;
    let height = y1 - y0 + 1;
    for j in 0..height {
        for i in 0..width {
            buf[j * width + i] = raster.lon(x0 + i, y0 + j);
        }
    }
    (width, height)
}

/// Lower and upper index of the clamped 2-sample block around `t` in `0..n`.
#[inline]
pub(crate) fn block_bounds(n: usize, t: f64) -> (usize, usize) {
    if n == 1 {
        return (0, 0);
    }
    let i0 = (t.floor().max(0.0) as usize).min(n - 2);
    (i0, i0 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_scene() {
        let raster = GeoRaster::dense(vec![0.0; 6], vec![0.0; 6], 3, 2, 1.0).unwrap();
        assert!(in_scene(&raster, &PixelPos::new(0.0, 0.0)));
        assert!(in_scene(&raster, &PixelPos::new(3.0, 2.0)));
        assert!(!in_scene(&raster, &PixelPos::new(3.01, 1.0)));
        assert!(!in_scene(&raster, &PixelPos::new(-0.01, 1.0)));
        assert!(!in_scene(&raster, &PixelPos::new(f64::NAN, 1.0)));
    }

    #[test]
    fn test_block_bounds() {
        assert_eq!(block_bounds(5, 2.3), (2, 3));
        assert_eq!(block_bounds(5, 4.0), (3, 4));
        assert_eq!(block_bounds(5, -0.5), (0, 1));
        assert_eq!(block_bounds(1, 0.7), (0, 0));
    }
}
