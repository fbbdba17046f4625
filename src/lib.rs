//! `resfit` library crate.
//!
//! The binary (`resfit`) is a thin wrapper around this library so that:
//!
//! - core numerics are testable without spawning processes
//! - the interpolation and fitting routines are reusable on their own
//!
//! Two workflows share the crate: Lagrange vs cubic spline interpolation of
//! resonance data (with peak/FWHM estimation), and least squares fits of the
//! `V(t)` / `W(t)` enzyme-growth models.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod interp;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
