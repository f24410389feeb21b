//! Error types for geocoding setup.
//!
//! Per-query failures never surface here: forward and inverse lookups report
//! them as NaN positions. Only structural problems detected while building a
//! raster or initializing a coding are errors.

use thiserror::Error;

/// Result type alias using GeoCodingError.
pub type GeoCodingResult<T> = Result<T, GeoCodingError>;

/// Primary error type for geocoding setup.
#[derive(Debug, Error)]
pub enum GeoCodingError {
    // === Raster Errors ===
    #[error("Invalid geo raster: {0}")]
    InvalidRaster(String),

    #[error("Dimension mismatch for '{what}': expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Raster not supported by {coding}: {message}")]
    UnsupportedRaster { coding: String, message: String },

    // === Fitting Errors ===
    #[error("No polynomial could be fitted for tile {tile}: {message}")]
    ApproximationFailed { tile: usize, message: String },

    // === Lifecycle Errors ===
    #[error("Unknown coding key: {0}")]
    UnknownCoding(String),

    #[error("Coding already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Coding has been disposed: {0}")]
    Disposed(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GeoCodingError {
    /// Create an InvalidRaster error.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create an UnsupportedRaster error.
    pub fn unsupported_raster(coding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedRaster {
            coding: coding.into(),
            message: message.into(),
        }
    }

    /// Create an ApproximationFailed error.
    pub fn approximation_failed(tile: usize, message: impl Into<String>) -> Self {
        Self::ApproximationFailed {
            tile,
            message: message.into(),
        }
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True for errors caused by the lifecycle of a coding rather than its data.
    pub fn is_lifecycle_error(&self) -> bool {
        matches!(
            self,
            GeoCodingError::AlreadyInitialized(_) | GeoCodingError::Disposed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeoCodingError::dimension_mismatch("longitudes", 12, 10);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch for 'longitudes': expected 12, got 10"
        );

        let err = GeoCodingError::approximation_failed(3, "all candidates singular");
        assert!(err.to_string().contains("tile 3"));
    }

    #[test]
    fn test_lifecycle_classification() {
        assert!(GeoCodingError::AlreadyInitialized("FWD_PIXEL".into()).is_lifecycle_error());
        assert!(GeoCodingError::Disposed("INV_TIE_POINT".into()).is_lifecycle_error());
        assert!(!GeoCodingError::invalid_raster("empty").is_lifecycle_error());
    }
}
