use crate::error::NumericError;

use super::{QueryPoints, validate_samples};

/// Global Lagrange interpolating polynomial through `n` samples.
///
/// `p(x) = Σ y_i · L_i(x)` with `L_i(x) = Π_{j≠i} (x - x_j) / (x_i - x_j)`.
///
/// The basis denominators `Π_{j≠i} (x_i - x_j)` are computed once at
/// construction; each evaluation is O(n²). Sample order does not matter.
/// The numerator at a node is built with the same operations as its
/// denominator, so samples are reproduced exactly.
#[derive(Debug, Clone)]
pub struct LagrangeInterp {
    xs: Vec<f64>,
    ys: Vec<f64>,
    denoms: Vec<f64>,
}

impl LagrangeInterp {
    /// Build the interpolant. Requires at least one sample and distinct x values.
    pub fn new(x_data: &[f64], y_data: &[f64]) -> Result<Self, NumericError> {
        validate_samples(x_data, y_data, 1)?;

        let n = x_data.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if x_data[i] == x_data[j] {
                    return Err(NumericError::DuplicateX { first: i, second: j });
                }
            }
        }

        let denoms = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .fold(1.0, |acc, j| acc * (x_data[i] - x_data[j]))
            })
            .collect();

        Ok(Self {
            xs: x_data.to_vec(),
            ys: y_data.to_vec(),
            denoms,
        })
    }

    /// Evaluate the polynomial at a single point.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let mut result = 0.0;
        for i in 0..n {
            let numer = (0..n)
                .filter(|&j| j != i)
                .fold(1.0, |acc, j| acc * (x - self.xs[j]));
            result += self.ys[i] * (numer / self.denoms[i]);
        }
        result
    }

    /// Evaluate at a scalar or at every point of a sequence.
    pub fn eval_at<Q: QueryPoints>(&self, x: Q) -> Q::Output {
        x.map_points(|v| self.eval(v))
    }

    /// Polynomial degree (`n - 1`).
    pub fn degree(&self) -> usize {
        self.xs.len() - 1
    }
}
