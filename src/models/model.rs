//! Model evaluation for the V / W kinetics.
//!
//! The fitter relies on two primitive operations:
//! - predict y(t) given parameters (for residuals/plots)
//! - fill a Jacobian row `∂y/∂p` (for Levenberg-Marquardt)

use crate::domain::KineticModel;
use crate::math::{lag_growth, lag_growth_dtau, saturation, saturation_dtau};

/// Predict `y(t)` for the given model.
///
/// `params` is `[τ]` for V and `[A, τ]` for W.
pub fn predict(model: KineticModel, t: f64, params: &[f64]) -> f64 {
    match model {
        KineticModel::V => saturation(t, params[0]),
        KineticModel::W => params[0] * lag_growth(t, params[1]),
    }
}

/// Fill `∂y/∂p` at `t` for the given model.
///
/// # Panics
/// Panics if `out` or `params` do not have length `model.param_count()`.
pub fn fill_jacobian_row(model: KineticModel, t: f64, params: &[f64], out: &mut [f64]) {
    match model {
        KineticModel::V => {
            out[0] = saturation_dtau(t, params[0]);
        }
        KineticModel::W => {
            out[0] = lag_growth(t, params[1]);
            out[1] = params[0] * lag_growth_dtau(t, params[1]);
        }
    }
}

/// Sample `model` on `n` evenly spaced times over `[t_min, t_max]`.
pub fn sample_model(model: KineticModel, params: &[f64], t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    crate::interp::linspace(t_min, t_max, n)
        .into_iter()
        .map(|t| (t, predict(model, t, params)))
        .collect()
}
