//! Pixel/geographic coordinate transforms for satellite swath imagery.
//!
//! A swath is geolocated either by a dense longitude/latitude raster with one
//! sample per pixel, or by a subsampled tie-point grid. This crate turns such
//! a [`GeoRaster`] into a two-way transform:
//!
//! - **Forward** (pixel → geo): sample lookup, bilinear, or cubic
//!   interpolation with seam-safe longitudes
//! - **Inverse** (geo → pixel): bucketed spatial index, quad-tree descent, or
//!   per-tile polynomial approximations
//!
//! # Architecture
//!
//! ```text
//! GeoRaster ──► ComponentGeoCoding::initialize()
//!                    │
//!                    ├─► detect antimeridian / poles
//!                    │
//!                    ├─► ForwardCoding::initialize   (FWD_* key)
//!                    │
//!                    └─► InverseCoding::initialize   (INV_* key)
//!                              │
//!                              ▼
//!              get_geo_pos / get_pixel_pos (read-only, any thread)
//! ```
//!
//! Queries never fail: positions that cannot be resolved come back with NaN
//! components. Only setup problems are reported as [`GeoCodingError`].
//!
//! # Example
//!
//! ```ignore
//! use geocoding::{ComponentGeoCoding, GeoCodingConfig, GeoPos, PixelPos};
//!
//! let mut coding = ComponentGeoCoding::from_config(raster, &GeoCodingConfig::from_env())?;
//! coding.initialize()?;
//!
//! let geo = coding.get_geo_pos(&PixelPos::new(10.5, 20.5));
//! let pixel = coding.get_pixel_pos(&geo);
//! ```

pub mod coding;
pub mod component;
pub mod config;
pub mod factory;
pub mod forward;
pub mod inverse;
pub mod testdata;
pub mod util;

// Re-export commonly used types at crate root
pub use coding::{CodingState, ForwardCoding, ForwardKey, InverseCoding, InverseKey};
pub use component::{AntiMeridianMode, ComponentGeoCoding};
pub use config::GeoCodingConfig;
pub use factory::ComponentFactory;
pub use forward::{PixelForward, PixelInterpolatingForward, TiePointBilinearForward, TiePointSplineForward};
pub use inverse::{Approximation, PixelGeoIndexInverse, PixelQuadTreeInverse, SearchResult, TiePointInverse};
pub use util::{AntiMeridianLonInterpolator, InverseDistanceWeightingInterpolator, LonInterpolation};

pub use geo_common::{GeoCodingError, GeoCodingResult, GeoPos, GeoRaster, PixelPos};
