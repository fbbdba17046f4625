//! Growth-model fitting.
//!
//! Responsibilities:
//!
//! - optional deterministic `τ` grid seeding (parallel)
//! - Levenberg-Marquardt refinement with analytic Jacobians
//! - covariance / standard errors and residuals

pub mod fitter;
pub mod tau_grid;

pub use fitter::*;
pub use tau_grid::*;
