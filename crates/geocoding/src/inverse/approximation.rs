//! Per-tile polynomial approximation of the inverse transform.

use geo_common::{GeoCodingError, GeoCodingResult, PixelPos};

use crate::util::Polynomial;

/// Scale that maps degrees into roughly [-2, 2] before fitting.
const RESCALE_DEG: f64 = 90.0;

/// One tie point used to fit an approximation: geographic position and
/// the pixel position it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpPoint {
    pub lat: f64,
    pub lon: f64,
    pub x: f64,
    pub y: f64,
}

/// Fitted polynomials `x = fX(lat, lon)` and `y = fY(lat, lon)` that are
/// trusted within a radius around the tile center.
#[derive(Debug, Clone)]
pub struct Approximation {
    f_x: Polynomial,
    f_y: Polynomial,
    rmse_x: f64,
    rmse_y: f64,
    center_lat: f64,
    center_lon: f64,
    max_square_distance: f64,
}

impl Approximation {
    /// Fit an approximation to the warp points of tile `tile`.
    pub fn fit(tile: usize, points: &[WarpPoint]) -> GeoCodingResult<Self> {
        if points.is_empty() {
            return Err(GeoCodingError::approximation_failed(tile, "tile has no warp points"));
        }
        let n = points.len() as f64;
        let center_lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
        let center_lon = points.iter().map(|p| p.lon).sum::<f64>() / n;

        let max_square_distance = points
            .iter()
            .map(|p| {
                let d_lat = p.lat - center_lat;
                let d_lon = p.lon - center_lon;
                d_lat * d_lat + d_lon * d_lon
            })
            .fold(0.0, f64::max);

        let u: Vec<f64> = points.iter().map(|p| rescale_lat(p.lat)).collect();
        let v: Vec<f64> = points.iter().map(|p| rescale_lon(p.lon, center_lon)).collect();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

        let (f_x, rmse_x) = Polynomial::fit_best(&u, &v, &xs).ok_or_else(|| {
            GeoCodingError::approximation_failed(tile, format!("no polynomial fits x over {} points", points.len()))
        })?;
        let (f_y, rmse_y) = Polynomial::fit_best(&u, &v, &ys).ok_or_else(|| {
            GeoCodingError::approximation_failed(tile, format!("no polynomial fits y over {} points", points.len()))
        })?;

        Ok(Self {
            f_x,
            f_y,
            rmse_x,
            rmse_y,
            center_lat,
            center_lon,
            max_square_distance: 1.1 * max_square_distance,
        })
    }

    pub fn f_x(&self) -> &Polynomial {
        &self.f_x
    }

    pub fn f_y(&self) -> &Polynomial {
        &self.f_y
    }

    /// RMS fit errors in pixels for x and y.
    pub fn rmse(&self) -> (f64, f64) {
        (self.rmse_x, self.rmse_y)
    }

    pub fn center_lat(&self) -> f64 {
        self.center_lat
    }

    pub fn center_lon(&self) -> f64 {
        self.center_lon
    }

    /// Squared degree radius beyond which the fit is not trusted.
    pub fn max_square_distance(&self) -> f64 {
        self.max_square_distance
    }

    /// Squared degree distance from the tile center.
    #[inline]
    pub fn square_distance(&self, lat: f64, lon: f64) -> f64 {
        let d_lat = lat - self.center_lat;
        let d_lon = lon - self.center_lon;
        d_lat * d_lat + d_lon * d_lon
    }

    /// Whether (`lat`, `lon`) lies inside the trust radius.
    #[inline]
    pub fn covers(&self, lat: f64, lon: f64) -> bool {
        self.square_distance(lat, lon) < self.max_square_distance
    }

    /// Evaluate both polynomials at a normalized geographic position.
    pub fn pixel_pos(&self, lat: f64, lon: f64) -> PixelPos {
        let u = rescale_lat(lat);
        let v = rescale_lon(lon, self.center_lon);
        PixelPos::new(self.f_x.evaluate(u, v), self.f_y.evaluate(u, v))
    }
}

#[inline]
fn rescale_lat(lat: f64) -> f64 {
    lat / RESCALE_DEG
}

#[inline]
fn rescale_lon(lon: f64, center_lon: f64) -> f64 {
    (lon - center_lon) / RESCALE_DEG
}
