//! Levenberg-Marquardt nonlinear least squares.
//!
//! Minimizes `0.5 · ||r(p)||²` using damped normal equations:
//!
//! ```text
//! (JᵀJ + μI) δ = -Jᵀr
//! ```
//!
//! Steps are accepted when the actual cost reduction is positive relative to
//! the reduction predicted by the linear model; `μ` shrinks after accepted
//! steps and grows after rejected ones, interpolating between Gauss-Newton
//! (small `μ`) and gradient descent (large `μ`).
//!
//! Residual evaluations that produce NaN/inf (e.g. a step that drives a time
//! constant through zero) are treated as rejected steps.
//!
//! Convergence tests are scale-aware: the gradient test is relative to the
//! cost, and the step-size test also runs on rejected steps. At the noise
//! floor of a real fit rounding makes every trial step "worse", so `μ` grows
//! until the proposed step vanishes, and that is the stopping point.

use nalgebra::{DMatrix, DVector};

use crate::error::NumericError;

/// Convergence tolerances and damping schedule.
#[derive(Debug, Clone, Copy)]
pub struct LmSettings {
    /// Convergence tolerance on gradient norm, relative: `||Jᵀr|| <= grad_tol · (1 + cost)`.
    pub grad_tol: f64,
    /// Convergence tolerance on relative step size.
    pub x_tol: f64,
    /// Convergence tolerance on relative cost change.
    pub f_tol: f64,
    pub max_iter: usize,
    /// Initial damping parameter.
    pub mu_init: f64,
    /// Factor to increase damping on rejected step.
    pub mu_increase: f64,
    /// Factor to decrease damping on accepted step.
    pub mu_decrease: f64,
}

impl Default for LmSettings {
    fn default() -> Self {
        Self {
            grad_tol: 1e-10,
            x_tol: 1e-12,
            f_tol: 1e-14,
            max_iter: 200,
            mu_init: 1e-3,
            mu_increase: 10.0,
            mu_decrease: 0.1,
        }
    }
}

/// Outcome of a converged least squares solve.
#[derive(Debug, Clone)]
pub struct LeastSquaresResult {
    /// Minimizer of `0.5 · ||r(p)||²`.
    pub x: DVector<f64>,
    /// Final cost `0.5 · ||r(p)||²`.
    pub cost: f64,
    /// Gradient norm `||Jᵀr||` at the last Jacobian evaluation.
    pub grad_norm: f64,
    pub iterations: usize,
    pub r_evals: usize,
    pub j_evals: usize,
}

/// Solve a nonlinear least squares problem with Levenberg-Marquardt.
///
/// # Errors
///
/// - [`NumericError::NonFinite`] if the residual at `x0` is not finite.
/// - [`NumericError::Singular`] if the damped system cannot be solved.
/// - [`NumericError::MaxIterations`] if no convergence test passes.
pub fn least_squares_lm(
    mut residual: impl FnMut(&DVector<f64>) -> DVector<f64>,
    mut jacobian: impl FnMut(&DVector<f64>) -> DMatrix<f64>,
    x0: &DVector<f64>,
    settings: &LmSettings,
) -> Result<LeastSquaresResult, NumericError> {
    let mut x = x0.clone();
    let mut r = residual(&x);
    if let Some(index) = r.iter().position(|v| !v.is_finite()) {
        return Err(NumericError::NonFinite { index });
    }
    let mut r_evals = 1usize;
    let mut j_evals = 0usize;

    let mut cost = 0.5 * r.dot(&r);
    let mut mu = settings.mu_init;

    for iter in 0..settings.max_iter {
        let j = jacobian(&x);
        j_evals += 1;

        let jt = j.transpose();
        let jtj = &jt * &j;
        let g = &jt * &r;
        let g_norm = g.norm();

        log::debug!("lm iter={iter} cost={cost:.6e} |g|={g_norm:.3e} mu={mu:.3e} x={:?}", x.as_slice());

        if g_norm <= settings.grad_tol * (1.0 + cost) {
            return Ok(LeastSquaresResult {
                x,
                cost,
                grad_norm: g_norm,
                iterations: iter,
                r_evals,
                j_evals,
            });
        }

        let delta = solve_damped(&jtj, mu, &(-&g))?;
        let step_converged = delta.norm() < settings.x_tol * (1.0 + x.norm());
        let x_new = &x + &delta;
        let r_new = residual(&x_new);
        r_evals += 1;

        if r_new.iter().any(|v| !v.is_finite()) {
            mu *= settings.mu_increase;
            continue;
        }
        let cost_new = 0.5 * r_new.dot(&r_new);

        // Predicted reduction of the linearized model: 0.5 · δᵀ(μδ - g).
        let predicted = 0.5 * delta.dot(&(&delta * mu - &g));
        let actual = cost - cost_new;

        if predicted > 0.0 && actual > 0.0 {
            x = x_new;
            r = r_new;
            cost = cost_new;
            mu *= settings.mu_decrease;

            if step_converged || actual.abs() < settings.f_tol * (1.0 + cost.abs()) {
                return Ok(LeastSquaresResult {
                    x,
                    cost,
                    grad_norm: g_norm,
                    iterations: iter + 1,
                    r_evals,
                    j_evals,
                });
            }
            continue;
        }

        // Rejected: a vanishing trial step means no further progress is possible.
        if step_converged {
            log::debug!("lm stalled at cost={cost:.6e} after {} iterations", iter + 1);
            return Ok(LeastSquaresResult {
                x,
                cost,
                grad_norm: g_norm,
                iterations: iter + 1,
                r_evals,
                j_evals,
            });
        }
        mu *= settings.mu_increase;
    }

    Err(NumericError::MaxIterations {
        iterations: settings.max_iter,
    })
}

/// Solve `(A + μI) x = b` via Cholesky, falling back to LU.
fn solve_damped(a: &DMatrix<f64>, mu: f64, b: &DVector<f64>) -> Result<DVector<f64>, NumericError> {
    let mut damped = a.clone();
    for i in 0..damped.nrows() {
        damped[(i, i)] += mu;
    }

    if let Some(chol) = damped.clone().cholesky() {
        return Ok(chol.solve(b));
    }

    damped.lu().solve(b).ok_or(NumericError::Singular)
}
