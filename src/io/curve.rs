//! Read/write curve JSON files.
//!
//! Curve JSON is the portable record of an interpolation run:
//! - the input samples and spline boundary condition
//! - the peak/FWHM estimate per method
//! - the dense evaluation grid for both interpolants
//!
//! The schema is defined by `domain::CurveFile`; `resfit plot --curve` re-renders it.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::CurveFile;
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    log::info!("wrote curve JSON to '{}'", path.display());
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;

    let n = curve.grid.x.len();
    if curve.grid.lagrange.len() != n || curve.grid.spline.len() != n {
        return Err(AppError::new(
            2,
            format!(
                "Invalid curve JSON: grid columns differ in length (x={n}, lagrange={}, spline={}).",
                curve.grid.lagrange.len(),
                curve.grid.spline.len()
            ),
        ));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::{CurveGrid, DataPoint, InterpMethod, MethodPeak};
    use crate::interp::{Peak, SplineBoundary};

    fn curve() -> CurveFile {
        CurveFile {
            tool: "resfit".to_string(),
            boundary: SplineBoundary::NotAKnot,
            samples: vec![DataPoint { x: 0.0, y: 1.0 }, DataPoint { x: 1.0, y: 3.0 }],
            peaks: vec![MethodPeak {
                method: InterpMethod::Spline,
                peak: Peak { x: 1.0, height: 3.0, left_x: 0.25, right_x: 1.0, fwhm: 0.75 },
            }],
            grid: CurveGrid {
                x: vec![0.0, 0.5, 1.0],
                lagrange: vec![1.0, 2.0, 3.0],
                spline: vec![1.0, 2.0, 3.0],
            },
        }
    }

    #[test]
    fn curve_json_survives_a_write_read_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");
        write_curve_json(&path, &curve()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"boundary\": \"not-a-knot\""), "{text}");
        assert_eq!(read_curve_json(&path).unwrap(), curve());
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let mut bad = curve();
        bad.grid.spline.pop();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&bad).unwrap()).unwrap();

        let err = read_curve_json(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("differ in length"));
    }

    #[test]
    fn garbage_is_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(read_curve_json(file.path()).unwrap_err().to_string().starts_with("Invalid curve JSON"));
    }
}
