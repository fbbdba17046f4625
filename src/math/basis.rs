//! Stable basis functions for the enzyme-activity kinetics.
//!
//! With `x = t/τ`:
//!
//! - `s(t, τ) = 1 - exp(-x)` (saturating induction, the V model)
//! - `g(t, τ) = exp(-x) - 1 + x` (lagged accumulation, the W model up to `A`)
//!
//! Numerical notes:
//! - `1 - exp(-x)` suffers from catastrophic cancellation for small `x`;
//!   we use `expm1`.
//! - `exp(-x) - 1 + x` cancels twice for small `x`; below `SMALL_X` we switch
//!   to its Taylor series `x²/2 - x³/6 + x⁴/24`.

/// Threshold below which `g` uses the series form.
const SMALL_X: f64 = 1e-3;

/// `s(t, τ) = 1 - exp(-t/τ)`.
pub fn saturation(t: f64, tau: f64) -> f64 {
    let x = t / tau;
    -(-x).exp_m1()
}

/// `∂s/∂τ = -(t/τ²) · exp(-t/τ)`.
pub fn saturation_dtau(t: f64, tau: f64) -> f64 {
    let x = t / tau;
    -(x / tau) * (-x).exp()
}

/// `g(t, τ) = exp(-t/τ) - 1 + t/τ`.
pub fn lag_growth(t: f64, tau: f64) -> f64 {
    let x = t / tau;
    if x.abs() < SMALL_X {
        let x2 = x * x;
        return x2 / 2.0 - x2 * x / 6.0 + x2 * x2 / 24.0;
    }
    (-x).exp_m1() + x
}

/// `∂g/∂τ = (t/τ²) · (exp(-t/τ) - 1)`.
pub fn lag_growth_dtau(t: f64, tau: f64) -> f64 {
    let x = t / tau;
    (x / tau) * (-x).exp_m1()
}
