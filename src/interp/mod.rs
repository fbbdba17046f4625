//! Interpolation of sparse samples and resonance peak analysis.
//!
//! The three entry points mirror the analysis workflow:
//!
//! - [`lagrange_interpolation`]: global polynomial through all samples
//! - [`cubic_spline_interpolation`]: natural cubic spline through all samples
//! - [`find_peak`]: peak location and full width at half maximum of a dense curve
//!
//! Query points can be a single `f64` or a sequence; the output shape follows
//! the input (see [`QueryPoints`]).
//!
//! ```
//! use resfit::interp::{cubic_spline_interpolation, lagrange_interpolation};
//!
//! let xs = [0.0, 1.0, 2.0];
//! let ys = [0.0, 1.0, 4.0]; // y = x²
//! let one = lagrange_interpolation(1.5, &xs, &ys).unwrap();
//! assert!((one - 2.25).abs() < 1e-12);
//!
//! let many = cubic_spline_interpolation(&[0.5, 1.5][..], &xs, &ys).unwrap();
//! assert_eq!(many.len(), 2);
//! ```

mod lagrange;
mod peak;
mod spline;

pub use lagrange::LagrangeInterp;
pub use peak::{Peak, analyze_peak};
pub use spline::{CubicSpline, SplineBoundary};

use crate::error::NumericError;

/// Query input for the interpolators: a scalar or a sequence of points.
///
/// Scalars map to scalars; sequences map to sequences of the same length.
pub trait QueryPoints {
    type Output;

    fn map_points<F: FnMut(f64) -> f64>(self, f: F) -> Self::Output;
}

impl QueryPoints for f64 {
    type Output = f64;

    fn map_points<F: FnMut(f64) -> f64>(self, mut f: F) -> f64 {
        f(self)
    }
}

impl QueryPoints for &[f64] {
    type Output = Vec<f64>;

    fn map_points<F: FnMut(f64) -> f64>(self, mut f: F) -> Vec<f64> {
        self.iter().map(|&x| f(x)).collect()
    }
}

impl QueryPoints for &Vec<f64> {
    type Output = Vec<f64>;

    fn map_points<F: FnMut(f64) -> f64>(self, f: F) -> Vec<f64> {
        self.as_slice().map_points(f)
    }
}

impl QueryPoints for Vec<f64> {
    type Output = Vec<f64>;

    fn map_points<F: FnMut(f64) -> f64>(self, f: F) -> Vec<f64> {
        self.into_iter().map(f).collect()
    }
}

impl<const N: usize> QueryPoints for [f64; N] {
    type Output = [f64; N];

    fn map_points<F: FnMut(f64) -> f64>(self, f: F) -> [f64; N] {
        self.map(f)
    }
}

/// Evaluate the Lagrange interpolating polynomial of `(x_data, y_data)` at `x`.
///
/// Fails with [`NumericError::DuplicateX`] if two samples share an x value.
pub fn lagrange_interpolation<Q: QueryPoints>(
    x: Q,
    x_data: &[f64],
    y_data: &[f64],
) -> Result<Q::Output, NumericError> {
    let interp = LagrangeInterp::new(x_data, y_data)?;
    Ok(interp.eval_at(x))
}

/// Evaluate the natural cubic spline through `(x_data, y_data)` at `x`.
///
/// Samples are sorted by x before fitting. Queries outside the sample range
/// extrapolate with the boundary segment's cubic.
pub fn cubic_spline_interpolation<Q: QueryPoints>(
    x: Q,
    x_data: &[f64],
    y_data: &[f64],
) -> Result<Q::Output, NumericError> {
    let spline = CubicSpline::new(x_data, y_data)?;
    Ok(spline.eval_at(x))
}

/// Find the peak position and FWHM of a densely sampled curve.
///
/// Returns `(peak_x, fwhm)`. Fails with [`NumericError::CurveTooShort`] when
/// the curve has fewer than two points.
pub fn find_peak(x: &[f64], y: &[f64]) -> Result<(f64, f64), NumericError> {
    let peak = analyze_peak(x, y)?;
    Ok((peak.x, peak.fwhm))
}

/// Evenly spaced points over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Shared sample validation: equal lengths, enough points, finite values.
fn validate_samples(x_data: &[f64], y_data: &[f64], min_points: usize) -> Result<(), NumericError> {
    if x_data.len() != y_data.len() {
        return Err(NumericError::LengthMismatch {
            x_len: x_data.len(),
            y_len: y_data.len(),
        });
    }
    if x_data.len() < min_points {
        return Err(NumericError::TooFewPoints {
            needed: min_points,
            got: x_data.len(),
        });
    }
    ensure_finite(x_data)?;
    ensure_finite(y_data)
}

fn ensure_finite(values: &[f64]) -> Result<(), NumericError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(NumericError::NonFinite { index }),
        None => Ok(()),
    }
}
