//! Formatted terminal output for both exercises.
//!
//! We keep formatting code in one place so:
//! - the numeric code stays clean and testable
//! - output changes are localized (snapshot-friendly)

use crate::domain::{DatasetStats, MethodPeak, ModelResidual, QueryValue};
use crate::fit::ModelFit;
use crate::interp::SplineBoundary;

/// Header + dataset stats + peak/FWHM per interpolation method.
pub fn format_interp_summary(
    source: &str,
    stats: &DatasetStats,
    boundary: SplineBoundary,
    dense_points: usize,
    peaks: &[MethodPeak],
) -> String {
    let mut out = String::new();

    out.push_str("=== resfit - Resonance Interpolation ===\n");
    out.push_str(&format!("Data: {source}\n"));
    out.push_str(&format!(
        "Points: n={} | x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));
    out.push_str(&format!(
        "Spline boundary: {} | dense grid: {dense_points} points\n",
        boundary_name(boundary)
    ));

    out.push_str("\nPeak analysis:\n");
    out.push_str(
        format!(
            "{:<14} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            "method", "peak_x", "height", "left", "right", "fwhm"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(rule(&[14, 10, 10, 10, 10, 10]).as_str());

    for p in peaks {
        out.push_str(&format!(
            "{:<14} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}\n",
            p.method.display_name(),
            p.peak.x,
            p.peak.height,
            p.peak.left_x,
            p.peak.right_x,
            p.peak.fwhm
        ));
    }

    out
}

/// Query table: both interpolants at user-chosen points.
pub fn format_query_table(rows: &[QueryValue]) -> String {
    let mut out = String::new();
    out.push_str("Interpolated values:\n");
    out.push_str(format!("{:>12} {:>14} {:>14} {:>12}\n", "x", "lagrange", "spline", "diff").trim_end());
    out.push('\n');
    out.push_str(rule(&[12, 14, 14, 12]).as_str());
    for r in rows {
        out.push_str(&format!(
            "{:>12.4} {:>14.4} {:>14.4} {:>12.4}\n",
            r.x,
            r.lagrange,
            r.spline,
            r.lagrange - r.spline
        ));
    }
    out
}

/// Fitted parameters (3 decimals) + diagnostics for one model.
pub fn format_fit_summary(fit: &ModelFit, stats: &DatasetStats) -> String {
    let mut out = String::new();

    let params: Vec<String> = fit
        .model
        .param_names()
        .iter()
        .zip(&fit.params)
        .map(|(name, v)| format!("{name} = {v:.3}"))
        .collect();
    out.push_str(&format!("{} fit parameters: {}\n", fit.model.display_name(), params.join(", ")));

    out.push_str(&format!(
        "  points: n={} | t=[{:.2}, {:.2}] | y=[{:.4}, {:.4}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));

    match fit.std_errors() {
        Some(se) => {
            let parts: Vec<String> = fit
                .model
                .param_names()
                .iter()
                .zip(fit.params.iter().zip(&se))
                .map(|(name, (v, e))| format!("{name} = {v:.6} ± {e:.6}"))
                .collect();
            out.push_str(&format!("  estimates: {}\n", parts.join(", ")));
        }
        None => out.push_str("  estimates: standard errors unavailable (too few points or singular JᵀJ)\n"),
    }

    out.push_str(&format!(
        "  SSE={:.6e} RMSE={:.6e} iterations={}\n",
        fit.quality.sse, fit.quality.rmse, fit.iterations
    ));

    out
}

/// Per-observation residual table.
pub fn format_residual_table(rows: &[ModelResidual]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>10} {:>12} {:>12} {:>12}\n", "t", "y_obs", "y_fit", "residual").trim_end());
    out.push('\n');
    out.push_str(rule(&[10, 12, 12, 12]).as_str());
    for r in rows {
        out.push_str(&format!(
            "{:>10.3} {:>12.5} {:>12.5} {:>12.5}\n",
            r.point.x, r.point.y, r.y_fit, r.residual
        ));
    }
    out
}

fn boundary_name(boundary: SplineBoundary) -> &'static str {
    match boundary {
        SplineBoundary::Natural => "natural",
        SplineBoundary::NotAKnot => "not-a-knot",
    }
}

fn rule(widths: &[usize]) -> String {
    let parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    format!("{}\n", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataPoint, FitQuality, InterpMethod, KineticModel};
    use crate::interp::Peak;
    use nalgebra::DMatrix;

    fn stats() -> DatasetStats {
        DatasetStats { n_points: 9, x_min: 0.0, x_max: 200.0, y_min: 4.7, y_max: 83.5 }
    }

    #[test]
    fn interp_summary_lists_each_method() {
        let peaks = [
            MethodPeak {
                method: InterpMethod::Lagrange,
                peak: Peak { x: 74.67, height: 84.0, left_x: 45.0, right_x: 102.86, fwhm: 57.86 },
            },
            MethodPeak {
                method: InterpMethod::Spline,
                peak: Peak { x: 76.28, height: 85.0, left_x: 46.0, right_x: 104.66, fwhm: 58.66 },
            },
        ];
        let txt = format_interp_summary("built-in", &stats(), SplineBoundary::Natural, 1000, &peaks);
        assert!(txt.contains("Spline boundary: natural | dense grid: 1000 points"));
        assert!(txt.contains("Lagrange"));
        assert!(txt.contains("Cubic spline        76.28"));
        assert!(txt.contains("57.86"));
    }

    #[test]
    fn fit_summary_prints_three_decimals_like_a_lab_report() {
        let fit = ModelFit {
            model: KineticModel::W,
            params: vec![0.81234, 2.49876],
            covariance: Some(DMatrix::from_row_slice(2, 2, &[0.0004, 0.0, 0.0, 0.0009])),
            quality: FitQuality { sse: 1e-3, rmse: 1e-2, n: 10 },
            iterations: 7,
        };
        let txt = format_fit_summary(&fit, &stats());
        assert!(txt.starts_with("W(t) fit parameters: A = 0.812, tau = 2.499\n"), "{txt}");
        assert!(txt.contains("A = 0.812340 ± 0.020000"));
        assert!(txt.contains("tau = 2.498760 ± 0.030000"));
        assert!(txt.contains("iterations=7"));
    }

    #[test]
    fn fit_summary_without_covariance() {
        let fit = ModelFit {
            model: KineticModel::V,
            params: vec![3.0],
            covariance: None,
            quality: FitQuality { sse: 0.0, rmse: 0.0, n: 1 },
            iterations: 1,
        };
        let txt = format_fit_summary(&fit, &stats());
        assert!(txt.starts_with("V(t) fit parameters: tau = 3.000\n"));
        assert!(txt.contains("standard errors unavailable"));
    }

    #[test]
    fn tables_have_one_row_per_entry() {
        let q = [
            QueryValue { x: 50.0, lagrange: 45.0, spline: 45.0 },
            QueryValue { x: -10.0, lagrange: -260.0, spline: 9.9 },
        ];
        let txt = format_query_table(&q);
        assert_eq!(txt.lines().count(), 3 + 2);
        assert!(txt.contains("-269.9000"));

        let r = [ModelResidual { point: DataPoint { x: 1.0, y: 0.5 }, y_fit: 0.4, residual: 0.1 }];
        assert_eq!(format_residual_table(&r).lines().count(), 3);
    }
}
