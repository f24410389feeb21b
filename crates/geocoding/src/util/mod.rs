//! Numeric helpers shared by the forward and inverse codings.

pub mod anti_meridian;
pub mod distance;
pub mod idw;
pub mod interpolation;
pub mod poles;
pub mod polynomial;

pub use anti_meridian::{AntiMeridianLonInterpolator, LonInterpolation};
pub use distance::{
    distance_m, lon_diff, normalize_lon, resolution_to_degrees, spherical_distance,
    MEAN_EARTH_RADIUS_M,
};
pub use idw::InverseDistanceWeightingInterpolator;
pub use poles::find_pole_locations;
pub use polynomial::{Polynomial, PolynomialFamily, POLYNOMIAL_FAMILIES};
