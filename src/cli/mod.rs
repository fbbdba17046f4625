//! Command-line parsing for `resfit`.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numeric code. Args are converted into plain config structs
//! by `app::*_config_from_args`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::KineticModel;
use crate::interp::SplineBoundary;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "resfit",
    version,
    about = "Resonance interpolation and enzyme-growth curve fitting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare Lagrange and cubic spline interpolation of resonance data and estimate peak/FWHM.
    ///
    /// Without `--data` the built-in neutron scattering dataset is used.
    Interp(InterpArgs),
    /// Fit the V(t) and W(t) growth models to measured `time,activity` files.
    Fit(FitArgs),
    /// Write a synthetic `time,activity` series for a kinetic model.
    Synth(SynthArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Options for the interpolation comparison.
#[derive(Debug, Parser, Clone)]
pub struct InterpArgs {
    /// Two-column `x,y` sample file (defaults to the built-in reference data).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Number of points in the dense evaluation grid.
    #[arg(long, default_value_t = 1000)]
    pub points: usize,

    /// Report both interpolants at these x values (repeatable).
    #[arg(long = "query", value_name = "X", allow_negative_numbers = true)]
    pub queries: Vec<f64>,

    /// Spline boundary condition.
    #[arg(long, value_enum, default_value_t = SplineBoundary::Natural)]
    pub boundary: SplineBoundary,

    /// Chart file (`.png` or `.svg`).
    #[arg(long, default_value = "interpolation_comparison.png")]
    pub chart: PathBuf,

    /// Do not write the chart file.
    #[arg(long)]
    pub no_chart: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the dense grid (`x,lagrange,spline`) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export samples, peaks and dense grid to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for growth-model fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// `time,activity` data for the V(t) model.
    #[arg(long, default_value = "g149novickA.txt")]
    pub v_data: PathBuf,

    /// `time,activity` data for the W(t) model.
    #[arg(long, default_value = "g149novickB.txt")]
    pub w_data: PathBuf,

    /// Initial guess for tau (hours).
    #[arg(long, default_value_t = 1.0)]
    pub tau0: f64,

    /// Initial guess for the W(t) amplitude A.
    #[arg(long = "a0", default_value_t = 1.0)]
    pub amplitude0: f64,

    /// Seed the optimizer from a log-spaced tau grid instead of `--tau0`.
    #[arg(long)]
    pub grid_seed: bool,

    /// Minimum tau for the seeding grid.
    #[arg(long, default_value_t = 0.01)]
    pub tau_min: f64,

    /// Maximum tau for the seeding grid.
    #[arg(long, default_value_t = 100.0)]
    pub tau_max: f64,

    /// Seeding grid steps.
    #[arg(long, default_value_t = 200)]
    pub tau_steps: usize,

    /// Maximum Levenberg-Marquardt iterations.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Directory for `v_model_fit.png` / `w_model_fit.png`.
    #[arg(long, default_value = ".")]
    pub chart_dir: PathBuf,

    /// Do not write chart files.
    #[arg(long)]
    pub no_chart: bool,

    /// Print the per-point residual table after each fit.
    #[arg(long)]
    pub residuals: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for synthetic series generation.
#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Kinetic model to sample.
    #[arg(long, value_enum)]
    pub model: KineticModel,

    /// Time constant tau (hours).
    #[arg(long)]
    pub tau: f64,

    /// Amplitude A (W model only).
    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 30)]
    pub n: usize,

    /// Last sample time (hours); samples start at 0.
    #[arg(long, default_value_t = 10.0)]
    pub t_max: f64,

    /// Standard deviation of additive Gaussian noise.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output file.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `resfit interp --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_defaults() {
        let cli = Cli::parse_from(["resfit", "interp"]);
        let Command::Interp(args) = cli.command else {
            panic!("expected interp");
        };
        assert_eq!(args.points, 1000);
        assert_eq!(args.boundary, SplineBoundary::Natural);
        assert_eq!(args.chart, PathBuf::from("interpolation_comparison.png"));
        assert!(args.queries.is_empty());
    }

    #[test]
    fn repeated_and_negative_queries() {
        let cli = Cli::parse_from([
            "resfit", "interp", "--query", "50", "--query", "-10", "--boundary", "not-a-knot",
        ]);
        let Command::Interp(args) = cli.command else {
            panic!("expected interp");
        };
        assert_eq!(args.queries, vec![50.0, -10.0]);
        assert_eq!(args.boundary, SplineBoundary::NotAKnot);
    }

    #[test]
    fn synth_requires_model_tau_and_out() {
        assert!(Cli::try_parse_from(["resfit", "synth", "--tau", "2"]).is_err());
        let cli = Cli::try_parse_from(["resfit", "synth", "--model", "w", "--tau", "2", "--out", "w.txt"]).unwrap();
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!(args.model, KineticModel::W);
        assert_eq!(args.n, 30);
    }

    #[test]
    fn fit_defaults_match_lab_files() {
        let cli = Cli::parse_from(["resfit", "fit", "--a0", "0.5"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.v_data, PathBuf::from("g149novickA.txt"));
        assert_eq!(args.amplitude0, 0.5);
        assert!(!args.grid_seed);
        assert!(!args.residuals);
    }
}
