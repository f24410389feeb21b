//! Interpolation kernels over row-major sample grids.
//!
//! Grid coordinates put sample (i, j) at (i, j). The `_with` variants pull
//! samples through a closure so callers can transform values on the fly
//! (rebasing longitudes, for instance) without copying the grid.

/// Keys cubic convolution parameter.
pub const KEYS_A: f64 = -0.75;

/// Bilinear interpolation over a `width` x `height` grid.
///
/// The 2x2 block is clamped to the grid, so positions past the last
/// row/column extrapolate from the outermost block.
pub fn bilinear(data: &[f64], width: usize, height: usize, x: f64, y: f64) -> f64 {
    bilinear_with(width, height, x, y, |i, j| data[j * width + i])
}

/// Bilinear interpolation reading samples through `sample(i, j)`.
pub fn bilinear_with<F>(width: usize, height: usize, x: f64, y: f64, sample: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    if width == 0 || height == 0 || x.is_nan() || y.is_nan() {
        return f64::NAN;
    }
    let (x0, x1, wx) = block(width, x);
    let (y0, y1, wy) = block(height, y);

    let v00 = sample(x0, y0);
    let v10 = sample(x1, y0);
    let v01 = sample(x0, y1);
    let v11 = sample(x1, y1);

    let top = v00 + wx * (v10 - v00);
    let bottom = v01 + wx * (v11 - v01);
    top + wy * (bottom - top)
}

/// Lower index, upper index and weight of the clamped 2-sample block around `x`.
#[inline]
fn block(n: usize, x: f64) -> (usize, usize, f64) {
    if n == 1 {
        return (0, 0, 0.0);
    }
    let i0 = (x.floor().max(0.0) as usize).min(n - 2);
    (i0, i0 + 1, x - i0 as f64)
}

/// Keys cubic convolution kernel.
#[inline]
pub fn keys_weight(s: f64) -> f64 {
    let a = KEYS_A;
    let s = s.abs();
    if s <= 1.0 {
        ((a + 2.0) * s - (a + 3.0)) * s * s + 1.0
    } else if s < 2.0 {
        ((a * s - 5.0 * a) * s + 8.0 * a) * s - 4.0 * a
    } else {
        0.0
    }
}

/// One-dimensional cubic convolution over `n` samples.
///
/// Nodes outside the grid are extrapolated with Keys' boundary condition
/// `c[-1] = 3c[0] - 3c[1] + c[2]` (linear when only two samples exist).
pub fn cubic_1d_with<F>(n: usize, x: f64, sample: F) -> f64
where
    F: Fn(usize) -> f64,
{
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }
    if n == 1 {
        return sample(0);
    }

    let i0 = (x.floor().max(0.0) as usize).min(n - 2) as isize;
    let last = n as isize - 1;

    let node = |k: isize| -> f64 {
        if k < 0 {
            if n >= 3 {
                3.0 * sample(0) - 3.0 * sample(1) + sample(2)
            } else {
                2.0 * sample(0) - sample(1)
            }
        } else if k > last {
            let m = n - 1;
            if n >= 3 {
                3.0 * sample(m) - 3.0 * sample(m - 1) + sample(m - 2)
            } else {
                2.0 * sample(m) - sample(m - 1)
            }
        } else {
            sample(k as usize)
        }
    };

    let mut sum = 0.0;
    for k in (i0 - 1)..=(i0 + 2) {
        let w = keys_weight(x - k as f64);
        if w != 0.0 {
            sum += w * node(k);
        }
    }
    sum
}

/// Separable bicubic convolution over a `width` x `height` grid.
pub fn bicubic(data: &[f64], width: usize, height: usize, x: f64, y: f64) -> f64 {
    bicubic_with(width, height, x, y, |i, j| data[j * width + i])
}

/// Separable bicubic convolution reading samples through `sample(i, j)`.
pub fn bicubic_with<F>(width: usize, height: usize, x: f64, y: f64, sample: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    if width == 0 || height == 0 {
        return f64::NAN;
    }
    cubic_1d_with(height, y, |j| cubic_1d_with(width, x, |i| sample(i, j)))
}
