//! Common test fixtures for geocoding tests.
//!
//! Literal geolocation values for scenarios that are awkward to generate:
//! seam crossings, degenerate grids and known interpolation results.

/// Longitude windows straddling the antimeridian.
pub mod anti_meridian {
    /// Row-major 3x3 longitude window crossing 180°.
    pub const WINDOW_3X3: [f64; 9] = [
        179.8645, -179.7243, -179.3128, //
        179.5499, 179.9598, -179.63, //
        179.2396, 179.648, -179.9431,
    ];

    /// Column and row inside [`WINDOW_3X3`] of the reference value.
    pub const WINDOW_QUERY: (f64, f64) = (0.5, 0.0);

    /// Cubic interpolation of [`WINDOW_3X3`] at [`WINDOW_QUERY`].
    pub const WINDOW_EXPECTED: f64 = -179.92995625;

    /// Two neighbouring samples on either side of the seam.
    pub const SEAM_PAIR: (f64, f64) = (179.95, -179.98);
}

/// Small regular lon/lat grids.
pub mod grid {
    /// 4x4 grid of 1 degree cells around the origin
    pub const SMALL_4X4: GridSpec = GridSpec {
        width: 4,
        height: 4,
        min_lon: -2.0,
        max_lon: 1.0,
        min_lat: -1.0,
        max_lat: 2.0,
    };

    /// Mid-latitude 32x24 grid of 0.05 degree cells
    pub const MID_LATITUDE: GridSpec = GridSpec {
        width: 32,
        height: 24,
        min_lon: 5.0,
        max_lon: 6.55,
        min_lat: 43.85,
        max_lat: 45.0,
    };

    /// 20x10 grid whose longitudes run from 179.1 through 180 to -179.0
    pub const PACIFIC_SEAM: GridSpec = GridSpec {
        width: 20,
        height: 10,
        min_lon: 179.1,
        max_lon: 181.0,
        min_lat: -4.5,
        max_lat: 0.0,
    };

    /// Regular grid specification for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        /// May exceed 180 for grids crossing the antimeridian.
        pub max_lon: f64,
        pub min_lat: f64,
        pub max_lat: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid samples.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Returns the sample spacing in degrees as (dlon, dlat).
        pub fn resolution(&self) -> (f64, f64) {
            let dx = (self.max_lon - self.min_lon) / (self.width - 1) as f64;
            let dy = (self.max_lat - self.min_lat) / (self.height - 1) as f64;
            (dx, dy)
        }

        /// Row-major (longitudes, latitudes), north to south, west to east.
        pub fn lon_lat(&self) -> (Vec<f64>, Vec<f64>) {
            let (dx, dy) = self.resolution();
            crate::generators::create_regular_geo_grid(
                self.width,
                self.height,
                self.min_lon,
                self.max_lat,
                dx,
                dy,
            )
        }
    }
}

/// Tie-point grids written out by hand.
pub mod tie_points {
    /// 3x3 tie points at subsampling 4, covering a 9x9 scene.
    pub const GRID_3X3_LON: [f64; 9] = [
        10.0, 10.4, 10.8, //
        10.0, 10.4, 10.8, //
        10.0, 10.4, 10.8,
    ];

    pub const GRID_3X3_LAT: [f64; 9] = [
        50.0, 50.0, 50.0, //
        49.6, 49.6, 49.6, //
        49.2, 49.2, 49.2,
    ];

    pub const GRID_3X3_SUBSAMPLING: f64 = 4.0;
}
