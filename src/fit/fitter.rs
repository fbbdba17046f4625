//! Nonlinear least squares fit of a single kinetic model.
//!
//! Given:
//! - observations `(t_i, y_i)`
//! - a model `y = f(t; p)` with analytic Jacobian
//! - an initial guess `p0`
//!
//! we minimize `Σ (y_i - f(t_i; p))²` with Levenberg-Marquardt and report the
//! parameters together with the usual covariance estimate
//! `(JᵀJ)⁻¹ · SSE / (n - k)`.

use nalgebra::{DMatrix, DVector};

use crate::domain::{DataPoint, FitQuality, KineticModel, ModelResidual};
use crate::error::{AppError, NumericError};
use crate::math::{LmSettings, least_squares_lm};
use crate::models::{fill_jacobian_row, predict};

/// Best fit for a single model.
#[derive(Debug, Clone)]
pub struct ModelFit {
    pub model: KineticModel,
    /// Parameters in `model.param_names()` order.
    pub params: Vec<f64>,
    /// Parameter covariance; `None` when `n <= k` or `JᵀJ` is singular.
    pub covariance: Option<DMatrix<f64>>,
    pub quality: FitQuality,
    pub iterations: usize,
}

impl ModelFit {
    /// One-sigma parameter uncertainties from the covariance diagonal.
    pub fn std_errors(&self) -> Option<Vec<f64>> {
        self.covariance
            .as_ref()
            .map(|cov| (0..cov.nrows()).map(|i| cov[(i, i)].max(0.0).sqrt()).collect())
    }

    pub fn tau(&self) -> f64 {
        self.params[self.model.tau_index()]
    }
}

/// Fit `model` to `points` starting from `p0`.
pub fn fit_model(
    model: KineticModel,
    points: &[DataPoint],
    p0: &[f64],
    settings: &LmSettings,
) -> Result<ModelFit, AppError> {
    let k = model.param_count();
    let n = points.len();
    if p0.len() != k {
        return Err(AppError::new(
            2,
            format!(
                "{} expects {k} initial parameter(s) ({}), got {}.",
                model.display_name(),
                model.param_names().join(", "),
                p0.len()
            ),
        ));
    }
    if n < k {
        return Err(AppError::numeric(
            &format!("{} fit", model.display_name()),
            NumericError::TooFewPoints { needed: k, got: n },
        ));
    }
    if let Some(index) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(AppError::numeric(
            &format!("{} fit", model.display_name()),
            NumericError::NonFinite { index },
        ));
    }

    let residual = |p: &DVector<f64>| {
        DVector::from_iterator(n, points.iter().map(|pt| predict(model, pt.x, p.as_slice()) - pt.y))
    };
    let jacobian = |p: &DVector<f64>| jacobian_matrix(model, points, p.as_slice());

    let x0 = DVector::from_row_slice(p0);
    let result = least_squares_lm(residual, jacobian, &x0, settings)
        .map_err(|e| AppError::numeric(&format!("{} fit", model.display_name()), e))?;

    let params: Vec<f64> = result.x.iter().copied().collect();
    let sse = 2.0 * result.cost;
    let rmse = (sse / n as f64).sqrt();
    let covariance = covariance(&jacobian_matrix(model, points, &params), sse, n, k);

    log::info!(
        "{} converged in {} iterations: params={:?} sse={:.6e}",
        model.display_name(),
        result.iterations,
        params,
        sse
    );

    Ok(ModelFit {
        model,
        params,
        covariance,
        quality: FitQuality { sse, rmse, n },
        iterations: result.iterations,
    })
}

/// Fitted values and residuals for each observation.
pub fn compute_residuals(points: &[DataPoint], fit: &ModelFit) -> Result<Vec<ModelResidual>, AppError> {
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        let y_fit = predict(fit.model, p.x, &fit.params);
        if !y_fit.is_finite() {
            return Err(AppError::new(4, "Non-finite model prediction during residual computation."));
        }
        out.push(ModelResidual {
            point: *p,
            y_fit,
            residual: p.y - y_fit,
        });
    }
    Ok(out)
}

fn jacobian_matrix(model: KineticModel, points: &[DataPoint], params: &[f64]) -> DMatrix<f64> {
    let k = model.param_count();
    let mut j = DMatrix::zeros(points.len(), k);
    let mut row = vec![0.0; k];
    for (i, p) in points.iter().enumerate() {
        fill_jacobian_row(model, p.x, params, &mut row);
        for (c, v) in row.iter().enumerate() {
            j[(i, c)] = *v;
        }
    }
    j
}

fn covariance(j: &DMatrix<f64>, sse: f64, n: usize, k: usize) -> Option<DMatrix<f64>> {
    if n <= k {
        return None;
    }
    let jtj = j.transpose() * j;
    let inv = jtj.try_inverse()?;
    if inv.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(inv * (sse / (n - k) as f64))
}
