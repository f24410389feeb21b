//! Geo-coding built from one forward and one inverse component.

use geo_common::{GeoCodingError, GeoCodingResult, GeoPos, GeoRaster, PixelPos};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::coding::{ForwardCoding, InverseCoding};
use crate::config::GeoCodingConfig;
use crate::factory::ComponentFactory;
use crate::util::find_pole_locations;

/// How the antimeridian flag handed to the components is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiMeridianMode {
    /// Detect from the raster longitudes.
    #[default]
    Auto,
    Contains,
    NotContains,
}

/// A complete pixel/geo transform over one geolocation raster.
pub struct ComponentGeoCoding {
    geo_raster: GeoRaster,
    forward: Box<dyn ForwardCoding>,
    inverse: Box<dyn InverseCoding>,
    anti_meridian: AntiMeridianMode,
    cross_anti_meridian: bool,
    pole_locations: Vec<PixelPos>,
    initialized: bool,
}

impl ComponentGeoCoding {
    pub fn new(
        geo_raster: GeoRaster,
        forward: Box<dyn ForwardCoding>,
        inverse: Box<dyn InverseCoding>,
        anti_meridian: AntiMeridianMode,
    ) -> Self {
        Self {
            geo_raster,
            forward,
            inverse,
            anti_meridian,
            cross_anti_meridian: false,
            pole_locations: Vec::new(),
            initialized: false,
        }
    }

    /// Pick components for `geo_raster` from `config`: dense keys for
    /// rasters with one sample per pixel, tie-point keys otherwise.
    pub fn from_config(geo_raster: GeoRaster, config: &GeoCodingConfig) -> GeoCodingResult<Self> {
        config.validate()?;
        let (forward_key, inverse_key) = config.keys_for(&geo_raster);
        debug!(forward = %forward_key, inverse = %inverse_key, "selected codings");
        Ok(Self::new(
            geo_raster,
            ComponentFactory::create_forward(forward_key),
            ComponentFactory::create_inverse(inverse_key, config),
            AntiMeridianMode::Auto,
        ))
    }

    /// Resolve the antimeridian flag, find poles and initialize both components.
    ///
    /// If the inverse fails, the already initialized forward is disposed, so
    /// the coding ends up disposed rather than half ready.
    pub fn initialize(&mut self) -> GeoCodingResult<()> {
        if self.initialized {
            return Err(GeoCodingError::AlreadyInitialized("ComponentGeoCoding".to_string()));
        }

        let raster = &self.geo_raster;
        self.cross_anti_meridian = match self.anti_meridian {
            AntiMeridianMode::Auto => raster.crosses_anti_meridian(),
            AntiMeridianMode::Contains => true,
            AntiMeridianMode::NotContains => false,
        };

        self.pole_locations = if raster.is_dense() {
            find_pole_locations(raster)
        } else {
            Vec::new()
        };

        self.forward
            .initialize(self.geo_raster.clone(), self.cross_anti_meridian)?;
        if let Err(err) = self.inverse.initialize(
            self.geo_raster.clone(),
            self.cross_anti_meridian,
            &self.pole_locations,
        ) {
            warn!(inverse = %self.inverse.key(), error = %err, "inverse failed, disposing forward");
            self.forward.dispose();
            return Err(err);
        }
        self.initialized = true;

        info!(
            forward = %self.forward.key(),
            inverse = %self.inverse.key(),
            scene_width = self.geo_raster.scene_width(),
            scene_height = self.geo_raster.scene_height(),
            anti_meridian = self.cross_anti_meridian,
            poles = self.pole_locations.len(),
            "geo-coding initialized"
        );
        Ok(())
    }

    pub fn get_geo_pos(&self, pixel_pos: &PixelPos) -> GeoPos {
        self.forward.get_geo_pos(pixel_pos)
    }

    pub fn get_pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos {
        self.inverse.get_pixel_pos(geo_pos)
    }

    pub fn can_get_geo_pos(&self) -> bool {
        self.initialized
    }

    pub fn can_get_pixel_pos(&self) -> bool {
        self.initialized
    }

    pub fn is_cross_anti_meridian(&self) -> bool {
        self.cross_anti_meridian
    }

    pub fn pole_locations(&self) -> &[PixelPos] {
        &self.pole_locations
    }

    pub fn geo_raster(&self) -> &GeoRaster {
        &self.geo_raster
    }

    pub fn forward(&self) -> &dyn ForwardCoding {
        self.forward.as_ref()
    }

    pub fn inverse(&self) -> &dyn InverseCoding {
        self.inverse.as_ref()
    }

    /// Dispose both components.
    pub fn dispose(&mut self) {
        self.forward.dispose();
        self.inverse.dispose();
        self.initialized = false;
    }
}

impl std::fmt::Debug for ComponentGeoCoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentGeoCoding")
            .field("forward", &self.forward.key())
            .field("inverse", &self.inverse.key())
            .field("cross_anti_meridian", &self.cross_anti_meridian)
            .field("poles", &self.pole_locations.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}
