//! Detection of geographic poles inside a dense geolocation raster.

use geo_common::{GeoRaster, PixelPos};
use tracing::debug;

/// Signed longitude step from `a` to `b`, wrapped into [-180, 180].
#[inline]
fn wrapped_step(a: f64, b: f64) -> f64 {
    let mut d = b - a;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

/// Find the pixel positions of poles contained in the raster.
///
/// A 2x2 cell of samples contains a pole when its corner longitudes wind a
/// full turn around it. The reported position is the cell center in pixel
/// coordinates.
pub fn find_pole_locations(raster: &GeoRaster) -> Vec<PixelPos> {
    let width = raster.raster_width();
    let height = raster.raster_height();
    let mut poles = Vec::new();
    if width < 2 || height < 2 {
        return poles;
    }

    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let ring = [
                raster.lon(x, y),
                raster.lon(x + 1, y),
                raster.lon(x + 1, y + 1),
                raster.lon(x, y + 1),
            ];
            if ring.iter().any(|v| v.is_nan()) {
                continue;
            }
            let winding: f64 = (0..4).map(|k| wrapped_step(ring[k], ring[(k + 1) % 4])).sum();
            if winding.abs() > 180.0 {
                let pos = PixelPos::new(
                    x as f64 + 0.5 + raster.offset_x(),
                    y as f64 + 0.5 + raster.offset_y(),
                );
                debug!(x = pos.x, y = pos.y, winding, "pole detected");
                poles.push(pos);
            }
        }
    }
    poles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_step() {
        assert_eq!(wrapped_step(170.0, -170.0), 20.0);
        assert_eq!(wrapped_step(-170.0, 170.0), -20.0);
        assert_eq!(wrapped_step(10.0, 30.0), 20.0);
    }

    #[test]
    fn test_pole_in_cell() {
        // Four samples around the north pole at 90° longitude steps
        let lons = vec![-135.0, 135.0, -45.0, 45.0];
        let lats = vec![89.9, 89.9, 89.9, 89.9];
        let raster = GeoRaster::dense(lons, lats, 2, 2, 1.0).unwrap();
        let poles = find_pole_locations(&raster);
        assert_eq!(poles, vec![PixelPos::new(1.0, 1.0)]);
    }

    #[test]
    fn test_no_pole() {
        let lons = vec![10.0, 11.0, 10.0, 11.0];
        let lats = vec![50.0, 50.0, 49.0, 49.0];
        let raster = GeoRaster::dense(lons, lats, 2, 2, 1.0).unwrap();
        assert!(find_pole_locations(&raster).is_empty());
    }
}
