//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - curves: one character per series, earlier series win on overlap

use crate::domain::{CurveFile, InterpMethod};

/// A curve to draw, with its plotting character and legend label.
#[derive(Debug, Clone, Copy)]
pub struct AsciiSeries<'a> {
    pub label: &'a str,
    pub ch: char,
    pub points: &'a [(f64, f64)],
}

/// Render observed `points` plus `curves` on a `width` x `height` grid.
pub fn render_ascii_plot(points: &[(f64, f64)], curves: &[AsciiSeries<'_>], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all = || points.iter().chain(curves.iter().flat_map(|c| c.points.iter()));
    let (x_min, x_max) = finite_range(all().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = finite_range(all().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curves first (so points can overlay).
    for curve in curves {
        draw_curve(&mut grid, curve.points, curve.ch, x_min, x_max, y_min, y_max);
    }

    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if !curves.is_empty() {
        let mut legend: Vec<String> = Vec::new();
        if !points.is_empty() {
            legend.push("o data".to_string());
        }
        legend.extend(curves.iter().map(|c| format!("{} {}", c.ch, c.label)));
        out.push_str(&format!("legend: {}\n", legend.join(" | ")));
    }

    out
}

/// Render a saved curve file: samples plus both interpolants.
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let samples: Vec<(f64, f64)> = curve.samples.iter().map(|p| (p.x, p.y)).collect();
    let spline = curve.grid.series(InterpMethod::Spline);
    let lagrange = curve.grid.series(InterpMethod::Lagrange);
    let curves = [
        AsciiSeries { label: InterpMethod::Spline.display_name(), ch: '-', points: &spline },
        AsciiSeries { label: InterpMethod::Lagrange.display_name(), ch: '.', points: &lagrange },
    ];
    render_ascii_plot(&samples, &curves, width, height)
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    ch: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None if grid[row][col] == ' ' => grid[row][col] = ch,
            None => {}
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveGrid, DataPoint};
    use crate::interp::SplineBoundary;

    #[test]
    fn plot_golden_snapshot_small() {
        let points = [(1.0, 100.0), (10.0, 110.0)];
        let flat = [(1.0, 100.0), (10.0, 100.0)];
        let curves = [AsciiSeries { label: "fit", ch: '-', points: &flat }];

        let txt = render_ascii_plot(&points, &curves, 10, 5);
        let expected = concat!(
            "Plot: x=[1.000, 10.000] | y=[99.50, 110.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
            "legend: o data | - fit\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn earlier_series_win_on_overlap() {
        let rising = [(0.0, 0.0), (10.0, 10.0)];
        let falling = [(0.0, 10.0), (10.0, 0.0)];
        let curves = [
            AsciiSeries { label: "up", ch: '/', points: &rising },
            AsciiSeries { label: "down", ch: '\\', points: &falling },
        ];

        let txt = render_ascii_plot(&[], &curves, 11, 11);
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows.len(), 1 + 11 + 1);
        // Both diagonals meet in the middle cell, which keeps the first series.
        assert_eq!(rows[6].chars().nth(5), Some('/'));
        assert!(txt.contains('\\'));
        assert_eq!(rows[12], "legend: / up | \\ down");
    }

    #[test]
    fn curve_file_plot_shows_samples_and_both_methods() {
        let curve = CurveFile {
            tool: "resfit".to_string(),
            boundary: SplineBoundary::Natural,
            samples: vec![DataPoint { x: 0.0, y: 0.0 }, DataPoint { x: 2.0, y: 4.0 }],
            peaks: Vec::new(),
            grid: CurveGrid {
                x: vec![0.0, 1.0, 2.0],
                lagrange: vec![0.0, 1.0, 4.0],
                spline: vec![0.0, 2.0, 4.0],
            },
        };
        let txt = render_ascii_plot_from_curve_file(&curve, 20, 8);
        assert!(txt.contains('o'));
        assert!(txt.contains('-'));
        assert!(txt.ends_with("legend: o data | - Cubic spline | . Lagrange\n"));
    }
}
