//! Coding traits, strategy keys and the per-instance lifecycle.

use std::fmt;
use std::str::FromStr;

use geo_common::{GeoCodingError, GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use serde::{Deserialize, Serialize};

/// Pixel to geographic transform.
pub trait ForwardCoding: Send + Sync {
    fn key(&self) -> ForwardKey;

    /// One-time setup. Must succeed before any query returns valid positions.
    fn initialize(&mut self, geo_raster: GeoRaster, contains_anti_meridian: bool) -> GeoCodingResult<()>;

    /// Geographic position of `pixel_pos`; NaN when out of bounds or not ready.
    fn get_geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos;

    /// Release backing data. The instance cannot be initialized again.
    fn dispose(&mut self);
}

/// Geographic to pixel transform.
pub trait InverseCoding: Send + Sync {
    fn key(&self) -> InverseKey;

    /// One-time setup. Must succeed before any query returns valid positions.
    fn initialize(
        &mut self,
        geo_raster: GeoRaster,
        contains_anti_meridian: bool,
        pole_locations: &[PixelPos],
    ) -> GeoCodingResult<()>;

    /// Pixel position of `geo_pos`; NaN when no match is found or not ready.
    fn get_pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos;

    /// Release backing data. The instance cannot be initialized again.
    fn dispose(&mut self);
}

/// Lifecycle of a coding instance.
#[derive(Debug, Default)]
pub enum CodingState<T> {
    #[default]
    Uninitialized,
    Ready(T),
    Disposed,
}

impl<T> CodingState<T> {
    /// Move into `Ready`, failing if the instance was initialized or disposed before.
    pub fn initialize(&mut self, name: &str, build: impl FnOnce() -> GeoCodingResult<T>) -> GeoCodingResult<()> {
        match self {
            CodingState::Uninitialized => {
                *self = CodingState::Ready(build()?);
                Ok(())
            }
            CodingState::Ready(_) => Err(GeoCodingError::AlreadyInitialized(name.to_string())),
            CodingState::Disposed => Err(GeoCodingError::Disposed(name.to_string())),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            CodingState::Ready(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CodingState::Ready(_))
    }

    pub fn dispose(&mut self) {
        *self = CodingState::Disposed;
    }
}

/// Forward coding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForwardKey {
    #[serde(rename = "FWD_PIXEL")]
    Pixel,
    #[serde(rename = "FWD_PIXEL_INTERPOLATING")]
    PixelInterpolating,
    #[serde(rename = "FWD_TIE_POINT_BILINEAR")]
    TiePointBilinear,
    #[serde(rename = "FWD_TIE_POINT_SPLINE")]
    TiePointSpline,
}

impl ForwardKey {
    pub const ALL: [ForwardKey; 4] = [
        ForwardKey::Pixel,
        ForwardKey::PixelInterpolating,
        ForwardKey::TiePointBilinear,
        ForwardKey::TiePointSpline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pixel => "FWD_PIXEL",
            Self::PixelInterpolating => "FWD_PIXEL_INTERPOLATING",
            Self::TiePointBilinear => "FWD_TIE_POINT_BILINEAR",
            Self::TiePointSpline => "FWD_TIE_POINT_SPLINE",
        }
    }

    /// True for strategies that need one geolocation sample per pixel.
    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Pixel | Self::PixelInterpolating)
    }
}

impl fmt::Display for ForwardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForwardKey {
    type Err = GeoCodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GeoCodingError::UnknownCoding(s.to_string()))
    }
}

/// Inverse coding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InverseKey {
    #[serde(rename = "INV_PIXEL_GEO_INDEX")]
    PixelGeoIndex,
    #[serde(rename = "INV_PIXEL_GEO_INDEX_INTERPOLATING")]
    PixelGeoIndexInterpolating,
    #[serde(rename = "INV_PIXEL_QUAD_TREE")]
    PixelQuadTree,
    #[serde(rename = "INV_PIXEL_QUAD_TREE_INTERPOLATING")]
    PixelQuadTreeInterpolating,
    #[serde(rename = "INV_TIE_POINT")]
    TiePoint,
}

impl InverseKey {
    pub const ALL: [InverseKey; 5] = [
        InverseKey::PixelGeoIndex,
        InverseKey::PixelGeoIndexInterpolating,
        InverseKey::PixelQuadTree,
        InverseKey::PixelQuadTreeInterpolating,
        InverseKey::TiePoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PixelGeoIndex => "INV_PIXEL_GEO_INDEX",
            Self::PixelGeoIndexInterpolating => "INV_PIXEL_GEO_INDEX_INTERPOLATING",
            Self::PixelQuadTree => "INV_PIXEL_QUAD_TREE",
            Self::PixelQuadTreeInterpolating => "INV_PIXEL_QUAD_TREE_INTERPOLATING",
            Self::TiePoint => "INV_TIE_POINT",
        }
    }

    /// True for strategies that need one geolocation sample per pixel.
    pub fn is_dense(&self) -> bool {
        !matches!(self, Self::TiePoint)
    }

    /// True for keys that always refine matches to fractional pixels.
    pub fn is_interpolating(&self) -> bool {
        matches!(
            self,
            Self::PixelGeoIndexInterpolating | Self::PixelQuadTreeInterpolating
        )
    }
}

impl fmt::Display for InverseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InverseKey {
    type Err = GeoCodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GeoCodingError::UnknownCoding(s.to_string()))
    }
}

/// Reject rasters that do not carry one sample per scene pixel.
pub(crate) fn require_dense(coding: &str, raster: &GeoRaster) -> GeoCodingResult<()> {
    if raster.raster_width() != raster.scene_width() || raster.raster_height() != raster.scene_height() {
        return Err(GeoCodingError::unsupported_raster(
            coding,
            format!(
                "dense coding needs a {}x{} raster, got {}x{}",
                raster.scene_width(),
                raster.scene_height(),
                raster.raster_width(),
                raster.raster_height()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for key in ForwardKey::ALL {
            assert_eq!(key.as_str().parse::<ForwardKey>().unwrap(), key);
        }
        for key in InverseKey::ALL {
            assert_eq!(key.to_string().parse::<InverseKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = "FWD_MAGIC".parse::<ForwardKey>().unwrap_err();
        assert!(matches!(err, GeoCodingError::UnknownCoding(ref k) if k == "FWD_MAGIC"));
        assert!("INV_PIXEL".parse::<InverseKey>().is_err());
    }

    #[test]
    fn test_key_classification() {
        assert!(ForwardKey::Pixel.is_dense());
        assert!(!ForwardKey::TiePointSpline.is_dense());
        assert!(InverseKey::PixelQuadTree.is_dense());
        assert!(!InverseKey::TiePoint.is_dense());
        assert!(InverseKey::PixelGeoIndexInterpolating.is_interpolating());
        assert!(!InverseKey::PixelGeoIndex.is_interpolating());
    }

    #[test]
    fn test_state_transitions() {
        let mut state: CodingState<u32> = CodingState::default();
        assert!(!state.is_ready());

        state.initialize("test", || Ok(7)).unwrap();
        assert_eq!(state.ready(), Some(&7));

        let err = state.initialize("test", || Ok(8)).unwrap_err();
        assert!(matches!(err, GeoCodingError::AlreadyInitialized(_)));

        state.dispose();
        assert!(state.ready().is_none());
        let err = state.initialize("test", || Ok(9)).unwrap_err();
        assert!(matches!(err, GeoCodingError::Disposed(_)));
    }

    #[test]
    fn test_failed_build_stays_uninitialized() {
        let mut state: CodingState<u32> = CodingState::default();
        assert!(state
            .initialize("test", || Err(GeoCodingError::invalid_raster("bad")))
            .is_err());
        assert!(matches!(state, CodingState::Uninitialized));
        state.initialize("test", || Ok(1)).unwrap();
    }
}
