//! Tau grid seeding.
//!
//! Levenberg-Marquardt only finds the local minimum nearest its starting
//! point. When `--grid-seed` is set we scan a deterministic log-spaced grid of
//! `τ` values first and start from the best one:
//!
//! - V model: the SSE is evaluated directly at each `τ`.
//! - W model: for fixed `τ` the model is linear in `A`, so `A` is solved by
//!   least squares and the resulting SSE is compared.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{DataPoint, KineticModel};
use crate::error::AppError;
use crate::math::{lag_growth, solve_least_squares};
use crate::models::predict;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::new(
            2,
            format!("Invalid tau range: min={min}, max={max} (must be finite, >0, and max>min)."),
        ));
    }
    if steps < 2 {
        return Err(AppError::new(2, "Tau steps must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    params: Vec<f64>,
    sse: f64,
}

/// Pick the best starting parameters for `model` over `tau_grid`.
pub fn grid_seed(model: KineticModel, points: &[DataPoint], tau_grid: &[f64]) -> Result<Vec<f64>, AppError> {
    if points.is_empty() {
        return Err(AppError::new(3, "No data points to fit."));
    }
    if tau_grid.is_empty() {
        return Err(AppError::new(4, "Tau grid is empty."));
    }

    // Evaluate each tau independently (parallel).
    let candidates: Vec<Candidate> = tau_grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &tau)| {
            let params = candidate_params(model, points, tau)?;
            let sse = sse(model, points, &params);
            sse.is_finite().then_some(Candidate { idx, params, sse })
        })
        .collect();

    // Deterministic selection: pick the minimum SSE; break ties by grid index.
    let best = candidates
        .into_iter()
        .min_by(|a, b| a.sse.total_cmp(&b.sse).then(a.idx.cmp(&b.idx)))
        .ok_or_else(|| {
            AppError::new(
                4,
                format!("No valid tau grid candidates for model {}.", model.display_name()),
            )
        })?;

    log::debug!(
        "grid seed for {}: params={:?} sse={:.6e} (grid index {})",
        model.display_name(),
        best.params,
        best.sse,
        best.idx
    );
    Ok(best.params)
}

fn candidate_params(model: KineticModel, points: &[DataPoint], tau: f64) -> Option<Vec<f64>> {
    match model {
        KineticModel::V => Some(vec![tau]),
        KineticModel::W => {
            let n = points.len();
            let x = DMatrix::from_iterator(n, 1, points.iter().map(|p| lag_growth(p.x, tau)));
            let y = DVector::from_iterator(n, points.iter().map(|p| p.y));
            let amplitude = solve_least_squares(&x, &y)?;
            Some(vec![amplitude[0], tau])
        }
    }
}

fn sse(model: KineticModel, points: &[DataPoint], params: &[f64]) -> f64 {
    points
        .iter()
        .map(|p| {
            let r = p.y - predict(model, p.x, params);
            r * r
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(model: KineticModel, params: &[f64]) -> Vec<DataPoint> {
        (0..30)
            .map(|i| {
                let x = 0.25 * i as f64;
                DataPoint { x, y: predict(model, x, params) }
            })
            .collect()
    }

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.1, 10.0, 5).unwrap();
        assert!((v[0] - 0.1).abs() < 1e-12);
        assert!((v[v.len() - 1] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn log_space_rejects_bad_ranges() {
        assert_eq!(log_space(0.0, 10.0, 5).unwrap_err().exit_code(), 2);
        assert_eq!(log_space(1.0, 10.0, 1).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn v_seed_picks_grid_point_closest_to_truth() {
        let points = series(KineticModel::V, &[2.0]);
        let grid = log_space(0.5, 8.0, 5).unwrap(); // 0.5, 1, 2, 4, 8
        let seed = grid_seed(KineticModel::V, &points, &grid).unwrap();
        assert!((seed[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn w_seed_solves_amplitude_exactly_on_true_tau() {
        let points = series(KineticModel::W, &[3.0, 1.0]);
        let grid = log_space(0.25, 4.0, 5).unwrap(); // includes 1.0
        let seed = grid_seed(KineticModel::W, &points, &grid).unwrap();
        assert!((seed[1] - 1.0).abs() < 1e-9);
        assert!((seed[0] - 3.0).abs() < 1e-8);
    }
}
