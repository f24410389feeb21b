//! Environment-driven configuration.
//!
//! Kept in its own test binary: it mutates process-wide environment
//! variables and must not race other tests reading them.

use geocoding::{ForwardKey, GeoCodingConfig, InverseKey};

#[test]
fn test_from_env() {
    std::env::set_var("GEOCODING_FRACTION_ACCURACY", "TRUE");
    std::env::set_var("GEOCODING_DENSE_FORWARD", "fwd_pixel_interpolating");
    std::env::set_var("GEOCODING_DENSE_INVERSE", "INV_PIXEL_GEO_INDEX");
    std::env::set_var("GEOCODING_TIE_POINT_FORWARD", "not-a-key");
    std::env::set_var("GEOCODING_MAX_POINTS_PER_TILE", "250");

    let config = GeoCodingConfig::from_env();
    assert!(config.fraction_accuracy);
    assert_eq!(config.dense_forward, ForwardKey::PixelInterpolating);
    assert_eq!(config.dense_inverse, InverseKey::PixelGeoIndex);
    // Unparsable values keep the default
    assert_eq!(config.tie_point_forward, ForwardKey::TiePointBilinear);
    assert_eq!(config.max_points_per_tile, 250);
    assert!(config.validate().is_ok());

    std::env::set_var("GEOCODING_MAX_POINTS_PER_TILE", "4");
    let config = GeoCodingConfig::from_env();
    assert!(config.validate().is_err());

    for var in [
        "GEOCODING_FRACTION_ACCURACY",
        "GEOCODING_DENSE_FORWARD",
        "GEOCODING_DENSE_INVERSE",
        "GEOCODING_TIE_POINT_FORWARD",
        "GEOCODING_MAX_POINTS_PER_TILE",
    ] {
        std::env::remove_var(var);
    }
    assert_eq!(GeoCodingConfig::from_env(), GeoCodingConfig::default());
}
