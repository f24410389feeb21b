//! Tests for the forward codings (pixel → geo).

use geocoding::testdata::SwathModel;
use geocoding::util::distance_m;
use geocoding::{
    AntiMeridianLonInterpolator, ComponentFactory, ForwardCoding, ForwardKey, GeoCodingError, GeoRaster,
    PixelForward, PixelInterpolatingForward, PixelPos, TiePointBilinearForward, TiePointSplineForward,
};
use test_utils::fixtures::{anti_meridian, grid, tie_points};
use test_utils::{assert_approx_eq, assert_geo_approx_eq, with_nans};

fn initialized(key: ForwardKey, raster: GeoRaster) -> Box<dyn ForwardCoding> {
    let mut coding = ComponentFactory::create_forward(key);
    let anti_meridian = raster.crosses_anti_meridian();
    coding.initialize(raster, anti_meridian).unwrap();
    coding
}

/// Copy of `raster` with the samples at `cells` replaced by fill values.
fn with_fill(raster: &GeoRaster, cells: &[(usize, usize)]) -> GeoRaster {
    let width = raster.raster_width();
    GeoRaster::tie_point(
        with_nans(raster.longitudes().to_vec(), width, cells),
        with_nans(raster.latitudes().to_vec(), width, cells),
        raster.scene_width(),
        raster.scene_height(),
        width,
        raster.raster_height(),
        raster.offset_x(),
        raster.offset_y(),
        raster.subsampling_x(),
        raster.subsampling_y(),
        raster.resolution_km(),
    )
    .unwrap()
}

/// Mean and max distance in meters between the forward result and the
/// analytic position over every pixel center.
fn forward_error(model: &SwathModel, coding: &dyn ForwardCoding) -> (f64, f64) {
    let mut sum = 0.0;
    let mut max: f64 = 0.0;
    let mut count = 0;
    for y in 0..model.height {
        for x in 0..model.width {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let geo = coding.get_geo_pos(&PixelPos::new(px, py));
            let truth = model.geo_at(px, py);
            let d = distance_m(geo.lon, geo.lat, truth.lon, truth.lat);
            assert!(!d.is_nan(), "invalid result at ({px}, {py})");
            sum += d;
            max = max.max(d);
            count += 1;
        }
    }
    (sum / count as f64, max)
}

// ============================================================================
// Dense forwards
// ============================================================================

#[test]
fn test_pixel_forward_returns_samples_exactly() {
    let model = SwathModel::new(30, 20, 1.1);
    let raster = model.dense_raster().unwrap();
    let coding = initialized(ForwardKey::Pixel, raster.clone());

    for y in 0..20 {
        for x in 0..30 {
            let expected = raster.sample(x, y).unwrap();
            // Pixel center and pixel corner address the same sample
            for (px, py) in [(x as f64 + 0.5, y as f64 + 0.5), (x as f64, y as f64)] {
                let geo = coding.get_geo_pos(&PixelPos::new(px, py));
                assert_eq!(geo.lat, expected.lat);
                assert_eq!(geo.lon, expected.lon);
            }
        }
    }
}

#[test]
fn test_pixel_forward_on_regular_grid() {
    let spec = grid::SMALL_4X4;
    let (lons, lats) = spec.lon_lat();
    let coding = initialized(ForwardKey::Pixel, GeoRaster::dense(lons, lats, spec.width, spec.height, 111.0).unwrap());

    // Rows run south from max_lat
    let geo = coding.get_geo_pos(&PixelPos::new(2.5, 1.5));
    assert_approx_eq!(geo.lon, 0.0, 1e-12);
    assert_approx_eq!(geo.lat, 1.0, 1e-12);
    let geo = coding.get_geo_pos(&PixelPos::new(0.5, 3.5));
    assert_approx_eq!(geo.lon, spec.min_lon, 1e-12);
    assert_approx_eq!(geo.lat, spec.min_lat, 1e-12);
}

#[test]
fn test_pixel_forward_far_edge() {
    let raster = SwathModel::new(8, 6, 1.1).dense_raster().unwrap();
    let coding = initialized(ForwardKey::Pixel, raster.clone());

    let geo = coding.get_geo_pos(&PixelPos::new(8.0, 6.0));
    assert_eq!(geo, raster.sample(7, 5).unwrap());
    assert!(!coding.get_geo_pos(&PixelPos::new(8.001, 3.0)).is_valid());
    assert!(!coding.get_geo_pos(&PixelPos::new(3.0, -0.001)).is_valid());
}

#[test]
fn test_pixel_interpolating_forward_blends_neighbours() {
    let lons = vec![10.0, 10.2, 10.0, 10.2];
    let lats = vec![50.0, 50.0, 49.8, 49.8];
    let raster = GeoRaster::dense(lons, lats, 2, 2, 22.0).unwrap();
    let coding = initialized(ForwardKey::PixelInterpolating, raster);

    // Halfway between the two sample centers
    let geo = coding.get_geo_pos(&PixelPos::new(1.0, 1.0));
    assert_approx_eq!(geo.lat, 49.9, 1e-12);
    assert_approx_eq!(geo.lon, 10.1, 1e-12);

    // Past the last sample center the outermost block extrapolates
    let geo = coding.get_geo_pos(&PixelPos::new(2.0, 0.5));
    assert_approx_eq!(geo.lon, 10.3, 1e-12);
}

#[test]
fn test_pixel_interpolating_forward_is_exact_on_samples() {
    let model = SwathModel::new(16, 12, 1.1);
    let coding = initialized(ForwardKey::PixelInterpolating, model.dense_raster().unwrap());
    let (mean, _) = forward_error(&model, coding.as_ref());
    assert!(mean < 1e-6, "mean error {mean} m");
}

// ============================================================================
// Tie-point forwards
// ============================================================================

#[test]
fn test_tie_point_forwards_hit_tie_points() {
    let raster = GeoRaster::tie_point(
        tie_points::GRID_3X3_LON.to_vec(),
        tie_points::GRID_3X3_LAT.to_vec(),
        9,
        9,
        3,
        3,
        0.5,
        0.5,
        tie_points::GRID_3X3_SUBSAMPLING,
        tie_points::GRID_3X3_SUBSAMPLING,
        44.0,
    )
    .unwrap();

    for key in [ForwardKey::TiePointBilinear, ForwardKey::TiePointSpline] {
        let coding = initialized(key, raster.clone());
        for j in 0..3 {
            for i in 0..3 {
                let pixel = PixelPos::new(0.5 + 4.0 * i as f64, 0.5 + 4.0 * j as f64);
                let expected = raster.sample(i, j).unwrap();
                assert_geo_approx_eq!(coding.get_geo_pos(&pixel), expected, 1e-9);
            }
        }
    }
}

#[test]
fn test_tie_point_forwards_on_regular_grid() {
    let raster = GeoRaster::tie_point(
        tie_points::GRID_3X3_LON.to_vec(),
        tie_points::GRID_3X3_LAT.to_vec(),
        9,
        9,
        3,
        3,
        0.5,
        0.5,
        4.0,
        4.0,
        44.0,
    )
    .unwrap();
    let coding = initialized(ForwardKey::TiePointBilinear, raster);

    // One pixel right of the first tie point is a quarter of the way to the next
    let geo = coding.get_geo_pos(&PixelPos::new(1.5, 0.5));
    assert_approx_eq!(geo.lon, 10.1, 1e-12);
    assert_approx_eq!(geo.lat, 50.0, 1e-12);
}

#[test]
fn test_accuracy_degrades_with_subsampling() {
    let model = SwathModel::default();

    for key in [ForwardKey::TiePointBilinear, ForwardKey::TiePointSpline] {
        let errors: Vec<(f64, f64)> = [3, 4, 6]
            .into_iter()
            .map(|sub| {
                let coding = initialized(key, model.tie_point_raster(sub).unwrap());
                forward_error(&model, coding.as_ref())
            })
            .collect();

        assert!(
            errors[0].0 < errors[1].0 && errors[1].0 < errors[2].0,
            "{key}: mean errors not increasing: {errors:?}"
        );
        // Far below the 1.1 km pixel size
        assert!(errors[2].1 < 600.0, "{key}: max error {} m", errors[2].1);
    }
}

#[test]
fn test_bilinear_tie_point_accuracy() {
    let model = SwathModel::default();
    let coding = initialized(ForwardKey::TiePointBilinear, model.tie_point_raster(4).unwrap());
    let (mean, max) = forward_error(&model, coding.as_ref());
    assert!(mean < 5.0, "mean error {mean} m");
    assert!(max < 10.0, "max error {max} m");
}

// ============================================================================
// Antimeridian
// ============================================================================

#[test]
fn test_anti_meridian_window_reference_value() {
    let (x, y) = anti_meridian::WINDOW_QUERY;
    let lon = AntiMeridianLonInterpolator::cubic().interpolate(&anti_meridian::WINDOW_3X3, 3, 3, x, y);
    assert_approx_eq!(lon, anti_meridian::WINDOW_EXPECTED, 1e-8);
}

#[test]
fn test_tie_point_forward_across_seam() {
    let (west, east) = anti_meridian::SEAM_PAIR;
    let lons = vec![west, east, west, east];
    let lats = vec![10.0, 10.0, 9.99, 9.99];
    let raster = GeoRaster::tie_point(lons, lats, 4, 4, 2, 2, 0.5, 0.5, 3.0, 3.0, 1.1).unwrap();
    assert!(raster.crosses_anti_meridian());

    for key in [ForwardKey::TiePointBilinear, ForwardKey::TiePointSpline] {
        let coding = initialized(key, raster.clone());
        for px in [0.5, 1.0, 2.0, 3.0, 3.5] {
            let geo = coding.get_geo_pos(&PixelPos::new(px, 2.0));
            assert!(geo.lon.abs() > 179.9, "{key} at x={px}: {}", geo.lon);
            assert!((-180.0..=180.0).contains(&geo.lon));
        }
        let mid = coding.get_geo_pos(&PixelPos::new(2.0, 0.5));
        assert_approx_eq!(mid.lon, 179.985, 1e-9);
    }
}

#[test]
fn test_pixel_interpolating_forward_across_seam() {
    let model = SwathModel::new(40, 20, 1.1).crossing_anti_meridian();
    let raster = model.dense_raster().unwrap();
    let coding = initialized(ForwardKey::PixelInterpolating, raster);

    for y in 0..20 {
        for x in 0..40 {
            let geo = coding.get_geo_pos(&PixelPos::new(x as f64 + 1.0, y as f64 + 1.0));
            assert!(geo.lon.abs() > 179.0, "({x}, {y}): {}", geo.lon);
        }
    }
}

#[test]
fn test_tie_point_forward_accuracy_across_seam() {
    let model = SwathModel::default().crossing_anti_meridian();
    let coding = initialized(ForwardKey::TiePointBilinear, model.tie_point_raster(4).unwrap());
    let (mean, max) = forward_error(&model, coding.as_ref());
    assert!(mean < 5.0, "mean error {mean} m");
    assert!(max < 10.0, "max error {max} m");
}

// ============================================================================
// Sentinels and lifecycle
// ============================================================================

#[test]
fn test_nan_pixel_gives_nan_geo() {
    let model = SwathModel::new(24, 16, 1.1);
    for key in ForwardKey::ALL {
        let raster = if key.is_dense() {
            model.dense_raster().unwrap()
        } else {
            model.tie_point_raster(4).unwrap()
        };
        let coding = initialized(key, raster);
        for pixel in [
            PixelPos::new(f64::NAN, 2.0),
            PixelPos::new(2.0, f64::NAN),
            PixelPos::invalid(),
        ] {
            let geo = coding.get_geo_pos(&pixel);
            assert!(geo.lat.is_nan() && geo.lon.is_nan(), "{key}: {geo:?}");
        }
    }
}

#[test]
fn test_nan_samples_only_affect_their_neighbourhood() {
    let model = SwathModel::new(24, 16, 1.1);
    let dense = model.dense_raster().unwrap();
    // 7 x 5 tie points at subsampling 4; (1, 1) sits under pixel (4.5, 4.5)
    let tie_point = model.tie_point_raster(4).unwrap();

    for key in ForwardKey::ALL {
        let (clean, filled, hole) = if key.is_dense() {
            (dense.clone(), with_fill(&dense, &[(5, 5)]), PixelPos::new(5.5, 5.5))
        } else {
            (tie_point.clone(), with_fill(&tie_point, &[(1, 1)]), PixelPos::new(4.5, 4.5))
        };
        let reference = initialized(key, clean);
        let coding = initialized(key, filled);

        let geo = coding.get_geo_pos(&hole);
        assert!(geo.lat.is_nan() && geo.lon.is_nan(), "{key}: {geo:?}");
        for pixel in [PixelPos::new(20.5, 14.5), PixelPos::new(22.0, 1.5), PixelPos::new(12.5, 13.5)] {
            let geo = coding.get_geo_pos(&pixel);
            assert!(geo.is_valid(), "{key}: {pixel:?}");
            assert_eq!(geo, reference.get_geo_pos(&pixel), "{key}: {pixel:?}");
        }
    }
}

#[test]
fn test_uninitialized_and_disposed_are_invalid() {
    let raster = SwathModel::new(8, 8, 1.1).dense_raster().unwrap();
    let mut coding = PixelForward::new();
    assert!(!coding.get_geo_pos(&PixelPos::new(1.0, 1.0)).is_valid());

    coding.initialize(raster.clone(), false).unwrap();
    assert!(coding.get_geo_pos(&PixelPos::new(1.0, 1.0)).is_valid());

    let err = coding.initialize(raster.clone(), false).unwrap_err();
    assert!(matches!(err, GeoCodingError::AlreadyInitialized(_)));

    coding.dispose();
    assert!(!coding.get_geo_pos(&PixelPos::new(1.0, 1.0)).is_valid());
    let err = coding.initialize(raster, false).unwrap_err();
    assert!(matches!(err, GeoCodingError::Disposed(_)));
}

#[test]
fn test_dense_forwards_reject_tie_point_rasters() {
    let raster = SwathModel::new(24, 16, 1.1).tie_point_raster(4).unwrap();

    let err = PixelForward::new().initialize(raster.clone(), false).unwrap_err();
    assert!(matches!(err, GeoCodingError::UnsupportedRaster { .. }));

    let mut interpolating = PixelInterpolatingForward::new();
    assert!(interpolating.initialize(raster.clone(), false).is_err());
    // A failed initialize leaves the coding usable
    let dense = SwathModel::new(24, 16, 1.1).dense_raster().unwrap();
    interpolating.initialize(dense, false).unwrap();

    // Tie-point forwards accept both kinds
    TiePointBilinearForward::new().initialize(raster.clone(), false).unwrap();
    TiePointSplineForward::new().initialize(raster, false).unwrap();
}
