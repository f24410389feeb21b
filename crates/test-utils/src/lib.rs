//! Shared test utilities for the swath geocoding workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate-equality assertions for scalars and positions
//! - Geolocation grid generators
//! - Literal fixtures (antimeridian windows, small grids)
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_geo_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two values with `lat`/`lon` fields, in degrees.
///
/// Longitudes are compared across the antimeridian, so 179.99 and -179.99
/// differ by 0.02.
///
/// ```ignore
/// assert_geo_approx_eq!(coding.get_geo_pos(&p), GeoPos::new(45.0, 10.0), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_geo_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        $crate::assert_approx_eq!(left.lat, right.lat, $epsilon);
        let d_lon = (left.lon - right.lon).abs() % 360.0;
        $crate::assert_approx_eq!(d_lon.min(360.0 - d_lon), 0.0, $epsilon);
    }};
}

/// Approximate equality of two values with `x`/`y` fields, in pixels.
///
/// ```ignore
/// assert_pixel_approx_eq!(coding.get_pixel_pos(&g), PixelPos::new(3.5, 7.5), 0.5);
/// ```
#[macro_export]
macro_rules! assert_pixel_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        $crate::assert_approx_eq!(left.x, right.x, $epsilon);
        $crate::assert_approx_eq!(left.y, right.y, $epsilon);
    }};
}
