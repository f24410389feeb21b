//! Bivariate polynomials fitted by least squares.
//!
//! Candidate families are described as data: a maximum degree and whether
//! the degree bounds the total `p + q` or each exponent separately
//! (tensor-product "bi-" families). Terms are `x^p * y^q`.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Relative singular value threshold below which a fit is rank deficient.
const RANK_TOLERANCE: f64 = 1e-10;

/// A family of bivariate polynomials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialFamily {
    pub name: &'static str,
    pub degree: u32,
    /// Bound each exponent by `degree` instead of their sum.
    pub tensor: bool,
}

impl PolynomialFamily {
    pub const fn new(name: &'static str, degree: u32, tensor: bool) -> Self {
        Self {
            name,
            degree,
            tensor,
        }
    }

    /// Exponent pairs `(p, q)` of every term, constant term first.
    pub fn terms(&self) -> Vec<(u32, u32)> {
        let mut terms = Vec::with_capacity(self.num_terms());
        for total in 0..=2 * self.degree {
            for p in (0..=total).rev() {
                let q = total - p;
                let keep = if self.tensor {
                    p <= self.degree && q <= self.degree
                } else {
                    total <= self.degree
                };
                if keep {
                    terms.push((p, q));
                }
            }
        }
        terms
    }

    pub fn num_terms(&self) -> usize {
        let d = self.degree as usize;
        if self.tensor {
            (d + 1) * (d + 1)
        } else {
            (d + 1) * (d + 2) / 2
        }
    }

    /// Fewest sample points accepted for a fit of this family.
    pub fn min_points(&self) -> usize {
        if self.tensor {
            2 * self.num_terms()
        } else {
            self.num_terms()
        }
    }
}

/// Candidate families in increasing order of degrees of freedom.
pub const POLYNOMIAL_FAMILIES: [PolynomialFamily; 8] = [
    PolynomialFamily::new("linear", 1, false),
    PolynomialFamily::new("bilinear", 1, true),
    PolynomialFamily::new("quadric", 2, false),
    PolynomialFamily::new("biquadric", 2, true),
    PolynomialFamily::new("cubic", 3, false),
    PolynomialFamily::new("bicubic", 3, true),
    PolynomialFamily::new("quartic", 4, false),
    PolynomialFamily::new("biquartic", 4, true),
];

/// A fitted polynomial.
#[derive(Debug, Clone)]
pub struct Polynomial {
    family: PolynomialFamily,
    terms: Vec<(u32, u32)>,
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn family(&self) -> PolynomialFamily {
        self.family
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate at (`x`, `y`).
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.terms
            .iter()
            .zip(&self.coefficients)
            .map(|(&(p, q), c)| c * x.powi(p as i32) * y.powi(q as i32))
            .sum()
    }

    /// Least-squares fit of `family` to the samples `z[i] ≈ f(x[i], y[i])`.
    ///
    /// Returns the polynomial and its RMS error, or `None` when there are
    /// too few points or the design matrix is rank deficient.
    pub fn fit(family: PolynomialFamily, x: &[f64], y: &[f64], z: &[f64]) -> Option<(Self, f64)> {
        let n = x.len().min(y.len()).min(z.len());
        if n < family.min_points() {
            return None;
        }

        let terms = family.terms();
        let design = DMatrix::from_fn(n, terms.len(), |i, k| {
            let (p, q) = terms[k];
            x[i].powi(p as i32) * y[i].powi(q as i32)
        });
        let rhs = DVector::from_row_slice(&z[..n]);

        let svd = design.svd(true, true);
        let s_max = svd.singular_values.max();
        let eps = RANK_TOLERANCE * s_max;
        if !(s_max > 0.0) || svd.rank(eps) < terms.len() {
            trace!(family = family.name, points = n, "rank deficient fit, skipping");
            return None;
        }
        let solution = match svd.solve(&rhs, eps) {
            Ok(s) => s,
            Err(e) => {
                trace!(family = family.name, error = e, "least squares solve failed");
                return None;
            }
        };

        let poly = Self {
            family,
            terms,
            coefficients: solution.iter().copied().collect(),
        };
        if poly.coefficients.iter().any(|c| !c.is_finite()) {
            return None;
        }

        let sum_sq: f64 = (0..n)
            .map(|i| {
                let r = poly.evaluate(x[i], y[i]) - z[i];
                r * r
            })
            .sum();
        let rmse = (sum_sq / n as f64).sqrt();
        Some((poly, rmse))
    }

    /// Fit every family with enough points and keep the one with the
    /// lowest RMS error.
    pub fn fit_best(x: &[f64], y: &[f64], z: &[f64]) -> Option<(Self, f64)> {
        let mut best: Option<(Self, f64)> = None;
        for family in POLYNOMIAL_FAMILIES {
            let Some((poly, rmse)) = Self::fit(family, x, y, z) else {
                continue;
            };
            trace!(family = family.name, rmse, "fitted candidate");
            match &best {
                Some((_, best_rmse)) if *best_rmse <= rmse => {}
                _ => best = Some((poly, rmse)),
            }
        }
        best
    }
}
