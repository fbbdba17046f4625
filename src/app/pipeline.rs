//! Shared pipeline logic behind the CLI subcommands.
//!
//! Keeping the workflows here keeps `app` focused on presentation:
//! - interpolation: samples -> Lagrange + spline -> dense grid -> peaks -> queries
//! - growth: series -> initial guess (optional tau grid) -> LM fit -> residuals

use std::path::{Path, PathBuf};

use crate::data::reference_samples;
use crate::domain::{
    CurveFile, CurveGrid, DataPoint, DatasetStats, GrowthConfig, InterpConfig, InterpMethod, KineticModel,
    MethodPeak, ModelResidual, QueryValue,
};
use crate::error::AppError;
use crate::fit::{ModelFit, compute_residuals, fit_model, grid_seed, log_space};
use crate::interp::{CubicSpline, LagrangeInterp, SplineBoundary, analyze_peak, linspace};
use crate::io::{IngestedData, load_samples, load_series};
use crate::math::LmSettings;
use crate::models::sample_model;

/// Points on each fitted curve drawn in charts and plots.
const FIT_CURVE_POINTS: usize = 300;

/// All computed outputs of a single `resfit interp` run.
#[derive(Debug, Clone)]
pub struct InterpRun {
    /// Where the samples came from (file path or built-in label).
    pub source: String,
    pub samples: Vec<DataPoint>,
    pub stats: DatasetStats,
    pub boundary: SplineBoundary,
    pub grid: CurveGrid,
    pub peaks: Vec<MethodPeak>,
    pub queries: Vec<QueryValue>,
}

impl InterpRun {
    /// Portable JSON representation of this run.
    pub fn curve_file(&self) -> CurveFile {
        CurveFile {
            tool: "resfit".to_string(),
            boundary: self.boundary,
            samples: self.samples.clone(),
            peaks: self.peaks.clone(),
            grid: self.grid.clone(),
        }
    }
}

/// Execute the interpolation comparison.
pub fn run_interp(config: &InterpConfig) -> Result<InterpRun, AppError> {
    if config.dense_points < 2 {
        return Err(AppError::new(2, "Dense grid needs at least 2 points."));
    }

    let (source, samples) = match &config.data_path {
        Some(path) => (path.display().to_string(), load_samples(path)?.points),
        None => ("built-in neutron resonance data".to_string(), reference_samples()),
    };
    let stats = DatasetStats::from_points(&samples).ok_or_else(|| AppError::new(3, "No samples to interpolate."))?;

    let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = samples.iter().map(|p| p.y).collect();

    let lagrange = LagrangeInterp::new(&xs, &ys).map_err(|e| AppError::numeric("Lagrange interpolation", e))?;
    let spline = CubicSpline::with_boundary(&xs, &ys, config.boundary)
        .map_err(|e| AppError::numeric("cubic spline interpolation", e))?;

    let x = linspace(stats.x_min, stats.x_max, config.dense_points);
    let grid = CurveGrid {
        lagrange: lagrange.eval_at(&x),
        spline: spline.eval_at(&x),
        x,
    };

    let mut peaks = Vec::with_capacity(InterpMethod::ALL.len());
    for method in InterpMethod::ALL {
        let peak = analyze_peak(&grid.x, grid.values(method))
            .map_err(|e| AppError::numeric(&format!("{} peak", method.display_name()), e))?;
        log::info!(
            "{}: peak at x={:.3} (height {:.3}), FWHM={:.3}",
            method.display_name(),
            peak.x,
            peak.height,
            peak.fwhm
        );
        peaks.push(MethodPeak { method, peak });
    }

    let queries = config
        .queries
        .iter()
        .map(|&q| QueryValue {
            x: q,
            lagrange: lagrange.eval(q),
            spline: spline.eval(q),
        })
        .collect();

    Ok(InterpRun {
        source,
        samples,
        stats,
        boundary: config.boundary,
        grid,
        peaks,
        queries,
    })
}

/// Outputs for one fitted growth model.
#[derive(Debug, Clone)]
pub struct ModelRun {
    pub source: PathBuf,
    pub ingest: IngestedData,
    pub fit: ModelFit,
    pub residuals: Vec<ModelResidual>,
    /// Fitted curve sampled over the observed time range.
    pub curve: Vec<(f64, f64)>,
}

/// All computed outputs of a single `resfit fit` run (V first, then W).
#[derive(Debug, Clone)]
pub struct GrowthRun {
    pub models: Vec<ModelRun>,
}

/// Execute the growth-model fits.
pub fn run_growth(config: &GrowthConfig) -> Result<GrowthRun, AppError> {
    let models = vec![
        run_model(KineticModel::V, &config.v_data, config)?,
        run_model(KineticModel::W, &config.w_data, config)?,
    ];
    Ok(GrowthRun { models })
}

fn run_model(model: KineticModel, path: &Path, config: &GrowthConfig) -> Result<ModelRun, AppError> {
    let ingest = load_series(path)?;
    let settings = LmSettings {
        max_iter: config.max_iter,
        ..LmSettings::default()
    };

    let p0 = if config.grid_seed {
        seeded_guess(model, &ingest.points, config)?
    } else {
        match model {
            KineticModel::V => vec![config.tau0],
            KineticModel::W => vec![config.amplitude0, config.tau0],
        }
    };
    let fit = fit_model(model, &ingest.points, &p0, &settings)?;

    let residuals = compute_residuals(&ingest.points, &fit)?;
    let curve = sample_model(
        model,
        &fit.params,
        ingest.stats.x_min,
        ingest.stats.x_max,
        FIT_CURVE_POINTS,
    );

    Ok(ModelRun {
        source: path.to_path_buf(),
        ingest,
        fit,
        residuals,
        curve,
    })
}

fn seeded_guess(model: KineticModel, points: &[DataPoint], config: &GrowthConfig) -> Result<Vec<f64>, AppError> {
    let taus = log_space(config.tau_min, config.tau_max, config.tau_steps)?;
    let p0 = grid_seed(model, points, &taus)?;
    log::debug!("{} grid seed: {:?}", model.display_name(), p0);
    Ok(p0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_sample;
    use crate::domain::SynthConfig;
    use crate::io::write_series_csv;

    fn interp_config() -> InterpConfig {
        InterpConfig {
            data_path: None,
            dense_points: 1000,
            queries: vec![50.0, -10.0, 250.0],
            boundary: SplineBoundary::Natural,
            chart: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_grid: None,
            export_curve: None,
        }
    }

    #[test]
    fn reference_run_finds_the_resonance() {
        let run = run_interp(&interp_config()).unwrap();
        assert_eq!(run.samples.len(), 9);
        assert_eq!(run.grid.x.len(), 1000);
        assert_eq!(run.peaks.len(), 2);
        for mp in &run.peaks {
            assert!(mp.peak.x > 70.0 && mp.peak.x < 90.0, "{:?}", mp);
            assert!(mp.peak.fwhm > 20.0 && mp.peak.fwhm < 100.0, "{:?}", mp);
        }

        let at_50 = run.queries[0];
        assert!((at_50.lagrange - 45.0).abs() < 1e-9);
        assert!((at_50.spline - 45.0).abs() < 1e-9);
        assert!(run.queries.iter().all(|q| q.lagrange.is_finite() && q.spline.is_finite()));
    }

    #[test]
    fn curve_file_mirrors_run() {
        let run = run_interp(&interp_config()).unwrap();
        let curve = run.curve_file();
        assert_eq!(curve.samples, run.samples);
        assert_eq!(curve.peaks, run.peaks);
        assert_eq!(curve.grid.spline.len(), 1000);
    }

    #[test]
    fn tiny_dense_grid_is_rejected() {
        let mut config = interp_config();
        config.dense_points = 1;
        assert_eq!(run_interp(&config).unwrap_err().exit_code(), 2);
    }

    fn write_synth(dir: &Path, model: KineticModel, tau: f64, amplitude: f64) -> PathBuf {
        let out = dir.join(format!("{model:?}.txt"));
        let config = SynthConfig {
            model,
            tau,
            amplitude,
            n: 25,
            t_max: 12.0,
            noise: 0.0,
            seed: 1,
            out: out.clone(),
        };
        let sample = generate_sample(&config).unwrap();
        write_series_csv(&out, "time,activity", &sample.points).unwrap();
        out
    }

    fn growth_config(v_data: PathBuf, w_data: PathBuf, grid_seed: bool) -> GrowthConfig {
        GrowthConfig {
            v_data,
            w_data,
            tau0: 1.0,
            amplitude0: 1.0,
            grid_seed,
            tau_min: 0.01,
            tau_max: 100.0,
            tau_steps: 200,
            max_iter: 200,
            chart_dir: None,
            show_residuals: false,
            plot: false,
            plot_width: 80,
            plot_height: 20,
        }
    }

    #[test]
    fn growth_run_recovers_synthetic_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let v = write_synth(dir.path(), KineticModel::V, 3.0, 1.0);
        let w = write_synth(dir.path(), KineticModel::W, 2.0, 0.6);

        for grid_seed in [false, true] {
            let run = run_growth(&growth_config(v.clone(), w.clone(), grid_seed)).unwrap();
            assert_eq!(run.models.len(), 2);

            let v_fit = &run.models[0].fit;
            assert_eq!(v_fit.model, KineticModel::V);
            assert!((v_fit.tau() - 3.0).abs() < 1e-4, "tau = {}", v_fit.tau());

            let w_fit = &run.models[1].fit;
            assert!((w_fit.params[0] - 0.6).abs() < 1e-4, "A = {}", w_fit.params[0]);
            assert!((w_fit.tau() - 2.0).abs() < 1e-4, "tau = {}", w_fit.tau());

            assert_eq!(run.models[1].curve.len(), FIT_CURVE_POINTS);
            assert_eq!(run.models[1].residuals.len(), 25);
        }
    }

    #[test]
    fn noisy_growth_data_fits_from_the_default_guess() {
        let dir = tempfile::tempdir().unwrap();
        let w = dir.path().join("w.txt");
        let config = SynthConfig {
            model: KineticModel::W,
            tau: 2.5,
            amplitude: 50.0,
            n: 40,
            t_max: 19.5,
            noise: 2.0,
            seed: 0,
            out: w.clone(),
        };
        write_series_csv(&w, "time,activity", &generate_sample(&config).unwrap().points).unwrap();
        let v = write_synth(dir.path(), KineticModel::V, 3.0, 1.0);

        let run = run_growth(&growth_config(v, w, false)).unwrap();
        let w_fit = &run.models[1].fit;
        assert!((w_fit.params[0] - 50.0).abs() < 2.5, "{:?}", w_fit.params);
        assert!((w_fit.tau() - 2.5).abs() < 0.125, "{:?}", w_fit.params);
    }

    #[test]
    fn fit_failures_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let v = write_synth(dir.path(), KineticModel::V, 3.0, 1.0);
        let w = write_synth(dir.path(), KineticModel::W, 2.0, 0.6);
        let mut config = growth_config(v, w, false);
        config.max_iter = 1;

        let err = run_growth(&config).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("fit: no convergence"), "{err}");
    }

    #[test]
    fn missing_series_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = growth_config(dir.path().join("nope.txt"), dir.path().join("nope.txt"), false);
        assert_eq!(run_growth(&config).unwrap_err().exit_code(), 2);
    }
}
