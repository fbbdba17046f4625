//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments into config structs
//! - runs the interpolation / growth-fit pipelines
//! - prints reports and terminal plots
//! - writes charts and optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, InterpArgs, PlotArgs, SynthArgs};
use crate::domain::{GrowthConfig, InterpConfig, SynthConfig};
use crate::error::AppError;
use crate::plot::{AsciiSeries, ChartSpec};

pub mod pipeline;

/// Entry point for the `resfit` binary.
pub fn run() -> Result<(), AppError> {
    // `resfit` and `resfit --points 500` behave like `resfit interp ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Interp(args) => handle_interp(args),
        Command::Fit(args) => handle_fit(args),
        Command::Synth(args) => handle_synth(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_interp(args: InterpArgs) -> Result<(), AppError> {
    let config = interp_config_from_args(&args);
    let run = pipeline::run_interp(&config)?;

    println!(
        "{}",
        crate::report::format_interp_summary(
            &run.source,
            &run.stats,
            run.boundary,
            config.dense_points,
            &run.peaks
        )
    );
    if !run.queries.is_empty() {
        println!("{}", crate::report::format_query_table(&run.queries));
    }

    let curve = run.curve_file();
    if config.plot {
        let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.chart {
        crate::plot::write_chart(path, &ChartSpec::interpolation(&run.samples, &run.grid))?;
        println!("Chart written to {}", path.display());
    }

    // Optional exports.
    if let Some(path) = &config.export_grid {
        crate::io::write_grid_csv(path, &run.grid)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::write_curve_json(path, &curve)?;
    }

    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = growth_config_from_args(&args);
    let run = pipeline::run_growth(&config)?;

    for m in &run.models {
        println!("[{}]", m.source.display());
        println!("{}", crate::report::format_fit_summary(&m.fit, &m.ingest.stats));
        if config.show_residuals {
            println!("{}", crate::report::format_residual_table(&m.residuals));
        }

        if config.plot {
            let observed: Vec<(f64, f64)> = m.ingest.points.iter().map(|p| (p.x, p.y)).collect();
            let curves = [AsciiSeries {
                label: m.fit.model.display_name(),
                ch: '-',
                points: &m.curve,
            }];
            let plot = crate::plot::render_ascii_plot(&observed, &curves, config.plot_width, config.plot_height);
            println!("{plot}");
        }

        if let Some(dir) = &config.chart_dir {
            let path = dir.join(m.fit.model.chart_file_name());
            let title = format!("{} Model Fit", m.fit.model.display_name());
            crate::plot::write_chart(&path, &ChartSpec::model_fit(&title, &m.ingest.points, m.curve.clone()))?;
            println!("Chart written to {}\n", path.display());
        }
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = synth_config_from_args(&args);
    let sample = crate::data::generate_sample(&config)?;

    let params = crate::data::synth_params(&config);
    let names = config.model.param_names();
    let described: Vec<String> = names.iter().zip(&params).map(|(n, v)| format!("{n}={v}")).collect();
    let comment = format!(
        "time,activity | {} {} noise={} seed={}",
        config.model.display_name(),
        described.join(" "),
        config.noise,
        config.seed
    );

    crate::io::write_series_csv(&config.out, &comment, &sample.points)?;
    println!(
        "Wrote {} points of {} (t=[{:.2}, {:.2}]) to {}",
        sample.stats.n_points,
        config.model.display_name(),
        sample.stats.x_min,
        sample.stats.x_max,
        config.out.display()
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::read_curve_json(&args.curve)?;

    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");

    for mp in &curve.peaks {
        println!(
            "{:<14} peak x={:.2} FWHM={:.2}",
            mp.method.display_name(),
            mp.peak.x,
            mp.peak.fwhm
        );
    }
    Ok(())
}

pub fn interp_config_from_args(args: &InterpArgs) -> InterpConfig {
    InterpConfig {
        data_path: args.data.clone(),
        dense_points: args.points,
        queries: args.queries.clone(),
        boundary: args.boundary,
        chart: (!args.no_chart).then(|| args.chart.clone()),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_grid: args.export.clone(),
        export_curve: args.export_curve.clone(),
    }
}

pub fn growth_config_from_args(args: &FitArgs) -> GrowthConfig {
    GrowthConfig {
        v_data: args.v_data.clone(),
        w_data: args.w_data.clone(),
        tau0: args.tau0,
        amplitude0: args.amplitude0,
        grid_seed: args.grid_seed,
        tau_min: args.tau_min,
        tau_max: args.tau_max,
        tau_steps: args.tau_steps,
        max_iter: args.max_iter,
        chart_dir: (!args.no_chart).then(|| args.chart_dir.clone()),
        show_residuals: args.residuals,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}

pub fn synth_config_from_args(args: &SynthArgs) -> SynthConfig {
    SynthConfig {
        model: args.model,
        tau: args.tau,
        amplitude: args.amplitude,
        n: args.n,
        t_max: args.t_max,
        noise: args.noise,
        seed: args.seed,
        out: args.out.clone(),
    }
}

/// Rewrite argv so `resfit` defaults to `resfit interp`.
///
/// Rules:
/// - `resfit`                        -> `resfit interp`
/// - `resfit --points 500 ...`       -> `resfit interp --points 500 ...`
/// - `resfit --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("interp".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "interp" | "fit" | "synth" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "interp flags".
    if arg1.starts_with('-') {
        argv.insert(1, "interp".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
