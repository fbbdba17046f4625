//! CSV exports.
//!
//! Meant to be easy to consume in spreadsheets or downstream scripts. Series
//! files are written without a header so `ingest` can read them back directly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{CurveGrid, DataPoint};
use crate::error::AppError;

/// Write the dense interpolation grid as `x,lagrange,spline`.
pub fn write_grid_csv(path: &Path, grid: &CurveGrid) -> Result<(), AppError> {
    let mut out = create(path)?;

    writeln!(out, "x,lagrange,spline").map_err(write_err)?;
    for ((x, l), s) in grid.x.iter().zip(&grid.lagrange).zip(&grid.spline) {
        writeln!(out, "{x:.10},{l:.10},{s:.10}").map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    log::info!("wrote {} grid rows to '{}'", grid.x.len(), path.display());
    Ok(())
}

/// Write `(t, y)` observations, one `t,y` pair per line, after a `#` comment line.
pub fn write_series_csv(path: &Path, comment: &str, points: &[DataPoint]) -> Result<(), AppError> {
    let mut out = create(path)?;

    writeln!(out, "# {comment}").map_err(write_err)?;
    for p in points {
        writeln!(out, "{:.6},{:.8}", p.x, p.y).map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    log::info!("wrote {} points to '{}'", points.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, AppError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_err(e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write export CSV: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::load_series;

    #[test]
    fn grid_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        let grid = CurveGrid {
            x: vec![0.0, 1.0],
            lagrange: vec![2.0, 3.5],
            spline: vec![2.0, 3.25],
        };
        write_grid_csv(&path, &grid).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x,lagrange,spline");
        assert_eq!(lines[2], "1.0000000000,3.5000000000,3.2500000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn series_csv_reads_back_through_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.txt");
        let points = vec![DataPoint { x: 0.0, y: 0.0 }, DataPoint { x: 0.5, y: 0.125 }];
        write_series_csv(&path, "V(t) tau=2", &points).unwrap();

        let data = load_series(&path).unwrap();
        assert_eq!(data.points, points);
        assert!(data.row_errors.is_empty());
    }
}
