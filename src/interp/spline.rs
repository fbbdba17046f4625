use clap::ValueEnum;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::NumericError;

use super::{QueryPoints, validate_samples};

/// End conditions for the cubic spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SplineBoundary {
    /// `S''(x_0) = S''(x_{n-1}) = 0`.
    #[default]
    Natural,
    /// Third derivative continuous at the second and second-to-last knots.
    NotAKnot,
}

/// Piecewise cubic interpolant with continuous first and second derivatives.
///
/// Each segment stores coefficients `[a, b, c, d]` for:
/// `S_i(x) = a + b·(x - x_i) + c·(x - x_i)² + d·(x - x_i)³`
///
/// Out-of-range queries extrapolate with the first/last segment's cubic.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    coeffs: Vec<[f64; 4]>,
    boundary: SplineBoundary,
}

impl CubicSpline {
    /// Natural cubic spline through the samples (any order, distinct x).
    pub fn new(x_data: &[f64], y_data: &[f64]) -> Result<Self, NumericError> {
        Self::with_boundary(x_data, y_data, SplineBoundary::Natural)
    }

    /// Cubic spline with the given end conditions.
    ///
    /// Samples are sorted by x first. Two samples give the straight line;
    /// not-a-knot with three samples gives the parabola through them.
    pub fn with_boundary(
        x_data: &[f64],
        y_data: &[f64],
        boundary: SplineBoundary,
    ) -> Result<Self, NumericError> {
        validate_samples(x_data, y_data, 2)?;

        let mut order: Vec<usize> = (0..x_data.len()).collect();
        order.sort_by(|&a, &b| x_data[a].total_cmp(&x_data[b]));
        for pair in order.windows(2) {
            if x_data[pair[0]] == x_data[pair[1]] {
                return Err(NumericError::DuplicateX {
                    first: pair[0].min(pair[1]),
                    second: pair[0].max(pair[1]),
                });
            }
        }
        let xs: Vec<f64> = order.iter().map(|&i| x_data[i]).collect();
        let ys: Vec<f64> = order.iter().map(|&i| y_data[i]).collect();

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let delta: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        let m = match (boundary, n) {
            (_, 2) => vec![0.0; 2],
            (SplineBoundary::Natural, _) => natural_second_derivatives(&h, &delta),
            (SplineBoundary::NotAKnot, 3) => {
                let curvature = 2.0 * (delta[1] - delta[0]) / (h[0] + h[1]);
                vec![curvature; 3]
            }
            (SplineBoundary::NotAKnot, _) => not_a_knot_second_derivatives(&h, &delta)?,
        };

        let coeffs = (0..n - 1)
            .map(|i| {
                let a = ys[i];
                let b = delta[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
                let c = m[i] / 2.0;
                let d = (m[i + 1] - m[i]) / (6.0 * h[i]);
                [a, b, c, d]
            })
            .collect();

        Ok(Self { xs, coeffs, boundary })
    }

    /// Evaluate the spline at a single point.
    pub fn eval(&self, x: f64) -> f64 {
        let i = find_interval(&self.xs, x);
        let dx = x - self.xs[i];
        let [a, b, c, d] = self.coeffs[i];
        a + dx * (b + dx * (c + dx * d))
    }

    /// Evaluate at a scalar or at every point of a sequence.
    pub fn eval_at<Q: QueryPoints>(&self, x: Q) -> Q::Output {
        x.map_points(|v| self.eval(v))
    }

    /// Sorted knot positions.
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    pub fn boundary(&self) -> SplineBoundary {
        self.boundary
    }
}

/// Thomas algorithm for the interior second derivatives, `m_0 = m_{n-1} = 0`.
///
/// Interior row i:
/// `h_{i-1}·m_{i-1} + 2(h_{i-1}+h_i)·m_i + h_i·m_{i+1} = 6·(δ_i - δ_{i-1})`
fn natural_second_derivatives(h: &[f64], delta: &[f64]) -> Vec<f64> {
    let n = h.len() + 1;
    let mut m = vec![0.0; n];
    let mut cp = vec![0.0; n];
    let mut dp = vec![0.0; n];

    for i in 1..n - 1 {
        let rhs = 6.0 * (delta[i] - delta[i - 1]);
        let diag = 2.0 * (h[i - 1] + h[i]) - h[i - 1] * cp[i - 1];
        cp[i] = h[i] / diag;
        dp[i] = (rhs - h[i - 1] * dp[i - 1]) / diag;
    }

    for i in (1..n - 1).rev() {
        m[i] = dp[i] - cp[i] * m[i + 1];
    }
    m
}

/// Full system for not-a-knot end conditions (n >= 4).
///
/// The first and last rows equate the third derivatives of the two boundary
/// segments, which breaks the tridiagonal structure, so we solve with LU.
fn not_a_knot_second_derivatives(h: &[f64], delta: &[f64]) -> Result<Vec<f64>, NumericError> {
    let n = h.len() + 1;
    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DVector::<f64>::zeros(n);

    a[(0, 0)] = -h[1];
    a[(0, 1)] = h[0] + h[1];
    a[(0, 2)] = -h[0];

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * (delta[i] - delta[i - 1]);
    }

    a[(n - 1, n - 3)] = -h[n - 2];
    a[(n - 1, n - 2)] = h[n - 3] + h[n - 2];
    a[(n - 1, n - 1)] = -h[n - 3];

    let m = a.lu().solve(&rhs).ok_or(NumericError::Singular)?;
    if m.iter().any(|v| !v.is_finite()) {
        return Err(NumericError::Singular);
    }
    Ok(m.iter().copied().collect())
}

/// Index `i` with `xs[i] <= x < xs[i+1]`, clamped to `[0, len - 2]`.
fn find_interval(xs: &[f64], x: f64) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if x < xs[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}
