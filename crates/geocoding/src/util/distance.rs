//! Longitude arithmetic and great-circle distances.

/// Mean earth radius in meters.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_007.181;

/// Wrap a longitude into [-180, 180]. NaN and infinities give NaN.
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    if !lon.is_finite() {
        return f64::NAN;
    }
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Absolute longitude difference, taking the short way around the globe.
#[inline]
pub fn lon_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Great-circle distance between two positions in radians (haversine).
///
/// Multiply by [`MEAN_EARTH_RADIUS_M`] to get meters.
pub fn spherical_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

/// Great-circle distance between two positions in meters.
#[inline]
pub fn distance_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    spherical_distance(lon1, lat1, lon2, lat2) * MEAN_EARTH_RADIUS_M
}

/// Angular size in degrees of a ground distance given in kilometers.
pub fn resolution_to_degrees(resolution_km: f64) -> f64 {
    let chord = resolution_km * 1000.0 / (2.0 * MEAN_EARTH_RADIUS_M);
    (2.0 * chord.min(1.0).asin()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(180.0), 180.0);
        assert_eq!(normalize_lon(-180.0), -180.0);
        assert!((normalize_lon(181.5) - (-178.5)).abs() < 1e-12);
        assert!((normalize_lon(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_lon(725.0) - 5.0).abs() < 1e-12);
        assert!(normalize_lon(f64::NAN).is_nan());
    }

    #[test]
    fn test_normalize_lon_non_finite() {
        assert!(normalize_lon(f64::INFINITY).is_nan());
        assert!(normalize_lon(f64::NEG_INFINITY).is_nan());
        let wrapped = normalize_lon(1e300);
        assert!((-180.0..=180.0).contains(&wrapped), "got {wrapped}");
    }

    #[test]
    fn test_lon_diff_wraps() {
        assert!((lon_diff(179.95, -179.98) - 0.07).abs() < 1e-9);
        assert!((lon_diff(-10.0, 10.0) - 20.0).abs() < 1e-12);
        assert_eq!(lon_diff(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_spherical_distance() {
        // One degree along the equator
        let d = distance_m(0.0, 0.0, 1.0, 0.0);
        let expected = MEAN_EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-6, "got {d}, expected {expected}");

        // Across the antimeridian
        let d = distance_m(179.5, 0.0, -179.5, 0.0);
        assert!((d - expected).abs() < 1e-6);

        assert_eq!(spherical_distance(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_resolution_to_degrees() {
        let deg = resolution_to_degrees(1.0);
        let expected = (1000.0 / MEAN_EARTH_RADIUS_M).to_degrees();
        assert!((deg - expected).abs() < 1e-9);
    }
}
