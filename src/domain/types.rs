//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during interpolation and fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::interp::{Peak, SplineBoundary};

/// Closed-form enzyme-activity models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KineticModel {
    /// `V(t) = 1 - exp(-t/τ)`.
    V,
    /// `W(t) = A · (exp(-t/τ) - 1 + t/τ)`.
    W,
}

impl KineticModel {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            KineticModel::V => "V(t)",
            KineticModel::W => "W(t)",
        }
    }

    /// Parameter names in the order used by `predict` and the fitter.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            KineticModel::V => &["tau"],
            KineticModel::W => &["A", "tau"],
        }
    }

    pub fn param_count(self) -> usize {
        self.param_names().len()
    }

    /// Index of `τ` in the parameter vector.
    pub fn tau_index(self) -> usize {
        match self {
            KineticModel::V => 0,
            KineticModel::W => 1,
        }
    }

    /// Default file name for the model's fit chart.
    pub fn chart_file_name(self) -> &'static str {
        match self {
            KineticModel::V => "v_model_fit.png",
            KineticModel::W => "w_model_fit.png",
        }
    }
}

/// Interpolation method used for a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpMethod {
    Lagrange,
    Spline,
}

impl InterpMethod {
    pub const ALL: [InterpMethod; 2] = [InterpMethod::Lagrange, InterpMethod::Spline];

    pub fn display_name(self) -> &'static str {
        match self {
            InterpMethod::Lagrange => "Lagrange",
            InterpMethod::Spline => "Cubic spline",
        }
    }
}

/// A single `(x, y)` observation.
///
/// For the resonance data `x` is energy (MeV) and `y` the cross section (mb);
/// for the growth data `x` is time (hours) and `y` the enzyme activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Summary stats about the points actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    /// Ranges over `points`; `None` when empty or non-finite.
    pub fn from_points(points: &[DataPoint]) -> Option<Self> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for p in points {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }

        if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
            return None;
        }

        Some(Self {
            n_points: points.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// A per-observation fitted value.
#[derive(Debug, Clone)]
pub struct ModelResidual {
    pub point: DataPoint,
    pub y_fit: f64,
    pub residual: f64,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Peak analysis for one interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodPeak {
    pub method: InterpMethod,
    pub peak: Peak,
}

/// Both interpolants evaluated at one query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryValue {
    pub x: f64,
    pub lagrange: f64,
    pub spline: f64,
}

/// Dense interpolation grid for both methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub lagrange: Vec<f64>,
    pub spline: Vec<f64>,
}

impl CurveGrid {
    pub fn values(&self, method: InterpMethod) -> &[f64] {
        match method {
            InterpMethod::Lagrange => &self.lagrange,
            InterpMethod::Spline => &self.spline,
        }
    }

    /// `(x, y)` pairs for one method, for plotting.
    pub fn series(&self, method: InterpMethod) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.values(method).iter().copied()).collect()
    }
}

/// A saved resonance analysis (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub boundary: SplineBoundary,
    pub samples: Vec<DataPoint>,
    pub peaks: Vec<MethodPeak>,
    pub grid: CurveGrid,
}

/// Resonance interpolation run, as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct InterpConfig {
    /// Sample CSV; `None` uses the built-in reference dataset.
    pub data_path: Option<PathBuf>,
    /// Number of points in the dense evaluation grid.
    pub dense_points: usize,
    /// Extra points at which to report both interpolants.
    pub queries: Vec<f64>,
    pub boundary: SplineBoundary,

    pub chart: Option<PathBuf>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_grid: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// Growth-model fitting run.
#[derive(Debug, Clone)]
pub struct GrowthConfig {
    pub v_data: PathBuf,
    pub w_data: PathBuf,

    /// Initial guess for `τ` (both models).
    pub tau0: f64,
    /// Initial guess for `A` (W model).
    pub amplitude0: f64,

    /// Seed the optimizer from a log-spaced `τ` grid instead of `tau0`.
    pub grid_seed: bool,
    pub tau_min: f64,
    pub tau_max: f64,
    pub tau_steps: usize,

    pub max_iter: usize,

    /// Directory for the chart files; `None` disables them.
    pub chart_dir: Option<PathBuf>,
    /// Print observed vs. fitted values for every point.
    pub show_residuals: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Synthetic growth series generation.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub model: KineticModel,
    pub tau: f64,
    pub amplitude: f64,
    pub n: usize,
    pub t_max: f64,
    /// Standard deviation of the additive Gaussian noise.
    pub noise: f64,
    pub seed: u64,
    pub out: PathBuf,
}
