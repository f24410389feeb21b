//! Configuration for geocoding strategy selection.

use geo_common::{GeoCodingError, GeoCodingResult, GeoRaster};
use serde::{Deserialize, Serialize};

use crate::coding::{ForwardKey, InverseKey};

/// Configuration for building a [`ComponentGeoCoding`](crate::ComponentGeoCoding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoCodingConfig {
    /// Refine dense inverse matches to fractional pixels.
    pub fraction_accuracy: bool,

    /// Forward strategy for rasters with one sample per pixel.
    pub dense_forward: ForwardKey,

    /// Inverse strategy for rasters with one sample per pixel.
    pub dense_inverse: InverseKey,

    /// Forward strategy for subsampled tie-point grids.
    pub tie_point_forward: ForwardKey,

    /// Upper bound on warp points used to fit one tie-point tile.
    pub max_points_per_tile: usize,
}

impl Default for GeoCodingConfig {
    fn default() -> Self {
        Self {
            fraction_accuracy: false,
            dense_forward: ForwardKey::Pixel,
            dense_inverse: InverseKey::PixelQuadTree,
            tie_point_forward: ForwardKey::TiePointBilinear,
            max_points_per_tile: 1000,
        }
    }
}

impl GeoCodingConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GEOCODING_FRACTION_ACCURACY") {
            config.fraction_accuracy = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("GEOCODING_DENSE_FORWARD") {
            if let Ok(key) = val.parse() {
                config.dense_forward = key;
            }
        }

        if let Ok(val) = std::env::var("GEOCODING_DENSE_INVERSE") {
            if let Ok(key) = val.parse() {
                config.dense_inverse = key;
            }
        }

        if let Ok(val) = std::env::var("GEOCODING_TIE_POINT_FORWARD") {
            if let Ok(key) = val.parse() {
                config.tie_point_forward = key;
            }
        }

        if let Ok(val) = std::env::var("GEOCODING_MAX_POINTS_PER_TILE") {
            if let Ok(n) = val.parse() {
                config.max_points_per_tile = n;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GeoCodingResult<()> {
        if !self.dense_forward.is_dense() {
            return Err(GeoCodingError::config(format!(
                "dense_forward must be a dense key, got {}",
                self.dense_forward
            )));
        }

        if !self.dense_inverse.is_dense() {
            return Err(GeoCodingError::config(format!(
                "dense_inverse must be a dense key, got {}",
                self.dense_inverse
            )));
        }

        if self.tie_point_forward.is_dense() {
            return Err(GeoCodingError::config(format!(
                "tie_point_forward must be a tie-point key, got {}",
                self.tie_point_forward
            )));
        }

        if self.max_points_per_tile < 10 {
            return Err(GeoCodingError::config("max_points_per_tile must be >= 10"));
        }

        Ok(())
    }

    /// Forward and inverse keys suited to `raster`.
    pub fn keys_for(&self, raster: &GeoRaster) -> (ForwardKey, InverseKey) {
        if raster.is_dense() {
            (self.dense_forward, self.dense_inverse)
        } else {
            (self.tie_point_forward, InverseKey::TiePoint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GeoCodingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dense_inverse, InverseKey::PixelQuadTree);
        assert_eq!(config.max_points_per_tile, 1000);
    }

    #[test]
    fn test_validate_rejects_mismatched_keys() {
        let config = GeoCodingConfig {
            dense_forward: ForwardKey::TiePointSpline,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeoCodingConfig {
            tie_point_forward: ForwardKey::Pixel,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeoCodingConfig {
            dense_inverse: InverseKey::TiePoint,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeoCodingConfig {
            max_points_per_tile: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_uses_key_names() {
        let config = GeoCodingConfig {
            dense_inverse: InverseKey::PixelGeoIndexInterpolating,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"INV_PIXEL_GEO_INDEX_INTERPOLATING\""));
        assert!(json.contains("\"FWD_PIXEL\""));

        let parsed: GeoCodingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: GeoCodingConfig =
            serde_json::from_str(r#"{"tie_point_forward":"FWD_TIE_POINT_SPLINE"}"#).unwrap();
        assert_eq!(parsed.tie_point_forward, ForwardKey::TiePointSpline);
        assert_eq!(parsed.dense_forward, ForwardKey::Pixel);
    }

    #[test]
    fn test_keys_for_raster() {
        let config = GeoCodingConfig::default();
        let dense = GeoRaster::dense(vec![0.0; 4], vec![0.0; 4], 2, 2, 1.0).unwrap();
        assert_eq!(config.keys_for(&dense), (ForwardKey::Pixel, InverseKey::PixelQuadTree));

        let tie = GeoRaster::tie_point(vec![0.0; 4], vec![0.0; 4], 8, 8, 2, 2, 0.5, 0.5, 7.0, 7.0, 1.0).unwrap();
        assert_eq!(config.keys_for(&tie), (ForwardKey::TiePointBilinear, InverseKey::TiePoint));
    }
}
