//! Geolocation grid generators.
//!
//! These generators create predictable longitude/latitude arrays whose
//! values can be checked by hand in assertions.

/// Creates a regular lon/lat grid.
///
/// Sample (col, row) has longitude `lon0 + col * dlon` (wrapped into
/// [-180, 180]) and latitude `lat0 - row * dlat`, so row 0 is the northern
/// edge for positive `dlat`.
///
/// # Returns
///
/// Row-major `(longitudes, latitudes)`, each `width * height` long.
///
/// # Example
///
/// ```
/// use test_utils::create_regular_geo_grid;
///
/// let (lons, lats) = create_regular_geo_grid(3, 2, 179.0, 10.0, 1.0, 0.5);
/// assert_eq!(lons, vec![179.0, 180.0, -179.0, 179.0, 180.0, -179.0]);
/// assert_eq!(lats[3], 9.5);
/// ```
pub fn create_regular_geo_grid(
    width: usize,
    height: usize,
    lon0: f64,
    lat0: f64,
    dlon: f64,
    dlat: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut lons = Vec::with_capacity(width * height);
    let mut lats = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let mut lon = lon0 + col as f64 * dlon;
            if lon > 180.0 {
                lon -= 360.0;
            }
            lons.push(lon);
            lats.push(lat0 - row as f64 * dlat);
        }
    }
    (lons, lats)
}

/// Creates a square grid centered on the north pole.
///
/// Samples are spaced `step_deg` of colatitude apart. With an even `size`
/// the pole falls in the middle of the central 2x2 cell, with an odd one
/// it falls exactly on the central sample.
///
/// # Example
///
/// ```
/// use test_utils::create_polar_grid;
///
/// let (lons, lats) = create_polar_grid(4, 1.0);
/// assert_eq!(lons.len(), 16);
/// assert!(lats.iter().all(|lat| *lat < 90.0 && *lat > 87.0));
/// ```
pub fn create_polar_grid(size: usize, step_deg: f64) -> (Vec<f64>, Vec<f64>) {
    let center = (size as f64 - 1.0) / 2.0;
    let mut lons = Vec::with_capacity(size * size);
    let mut lats = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let dx = col as f64 - center;
            let dy = row as f64 - center;
            lats.push(90.0 - dx.hypot(dy) * step_deg);
            lons.push(dx.atan2(-dy).to_degrees());
        }
    }
    (lons, lats)
}

/// Replaces the samples at `nan_positions` with NaN.
///
/// Useful for testing missing geolocation handling. Positions outside the
/// grid are ignored.
///
/// # Arguments
///
/// * `data` - Row-major samples
/// * `width` - Number of columns
/// * `nan_positions` - List of (col, row) positions that should be NaN
pub fn with_nans(mut data: Vec<f64>, width: usize, nan_positions: &[(usize, usize)]) -> Vec<f64> {
    for &(col, row) in nan_positions {
        if col < width {
            if let Some(v) = data.get_mut(row * width + col) {
                *v = f64::NAN;
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid_wraps() {
        let (lons, lats) = create_regular_geo_grid(4, 3, 178.0, 0.0, 1.0, 1.0);
        assert_eq!(lons.len(), 12);
        assert_eq!(lons[2], 180.0);
        assert_eq!(lons[3], -179.0);
        assert_eq!(lats[11], -2.0);
    }

    #[test]
    fn test_polar_grid_center_cell() {
        let (lons, lats) = create_polar_grid(4, 1.0);
        // Corners of the central cell all sit at the same colatitude
        for idx in [5, 6, 9, 10] {
            assert!((lats[idx] - (90.0 - std::f64::consts::FRAC_1_SQRT_2)).abs() < 1e-12);
        }
        assert!((lons[5] - (-45.0)).abs() < 1e-12);
        assert!((lons[6] - 45.0).abs() < 1e-12);
        assert!((lons[10] - 135.0).abs() < 1e-12);
        assert!((lons[9] - (-135.0)).abs() < 1e-12);
    }

    #[test]
    fn test_with_nans() {
        let data = with_nans(vec![1.0; 6], 3, &[(1, 1), (5, 0)]);
        assert!(data[4].is_nan());
        assert_eq!(data.iter().filter(|v| v.is_nan()).count(), 1);
    }
}
