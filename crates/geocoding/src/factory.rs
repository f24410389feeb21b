//! Factory for creating coding components from their keys.
//!
//! ```rust,ignore
//! use geocoding::{ComponentFactory, ForwardKey, GeoCodingConfig, InverseKey};
//!
//! let config = GeoCodingConfig::from_env();
//! let forward = ComponentFactory::create_forward(ForwardKey::TiePointSpline);
//! let inverse = ComponentFactory::create_inverse(InverseKey::TiePoint, &config);
//! ```

use crate::coding::{ForwardCoding, ForwardKey, InverseCoding, InverseKey};
use crate::config::GeoCodingConfig;
use crate::forward::{PixelForward, PixelInterpolatingForward, TiePointBilinearForward, TiePointSplineForward};
use crate::inverse::{PixelGeoIndexInverse, PixelQuadTreeInverse, TiePointInverse};

/// Creates uninitialized forward and inverse codings.
pub struct ComponentFactory;

impl ComponentFactory {
    /// Create the forward coding for `key`.
    pub fn create_forward(key: ForwardKey) -> Box<dyn ForwardCoding> {
        match key {
            ForwardKey::Pixel => Box::new(PixelForward::new()),
            ForwardKey::PixelInterpolating => Box::new(PixelInterpolatingForward::new()),
            ForwardKey::TiePointBilinear => Box::new(TiePointBilinearForward::new()),
            ForwardKey::TiePointSpline => Box::new(TiePointSplineForward::new()),
        }
    }

    /// Create the inverse coding for `key`.
    ///
    /// `_INTERPOLATING` keys always refine matches; the plain dense keys
    /// follow `config.fraction_accuracy`.
    pub fn create_inverse(key: InverseKey, config: &GeoCodingConfig) -> Box<dyn InverseCoding> {
        let fraction_accuracy = key.is_interpolating() || config.fraction_accuracy;
        match key {
            InverseKey::PixelGeoIndex | InverseKey::PixelGeoIndexInterpolating => {
                Box::new(PixelGeoIndexInverse::new(fraction_accuracy))
            }
            InverseKey::PixelQuadTree | InverseKey::PixelQuadTreeInterpolating => {
                Box::new(PixelQuadTreeInverse::new(fraction_accuracy))
            }
            InverseKey::TiePoint => Box::new(TiePointInverse::new(config.max_points_per_tile)),
        }
    }
}
