use serde::{Deserialize, Serialize};

use crate::error::NumericError;

use super::ensure_finite;

/// Peak location and width of a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// x at the (first) maximum.
    pub x: f64,
    /// Curve value at the maximum.
    pub height: f64,
    /// Left half-maximum crossing (or the first x if the curve never drops).
    pub left_x: f64,
    /// Right half-maximum crossing (or the last x if the curve never drops).
    pub right_x: f64,
    /// `right_x - left_x`.
    pub fwhm: f64,
}

/// Locate the maximum of `(x, y)` and its half-maximum crossings.
///
/// The left crossing is the last sample before the peak with `y <= max/2`;
/// the right crossing is the first sample from the peak onward with
/// `y <= max/2`. When a side never reaches half maximum, the array boundary
/// on that side is used instead, so the width can be overstated for curves
/// that are cut off by the sampled range.
pub fn analyze_peak(x: &[f64], y: &[f64]) -> Result<Peak, NumericError> {
    if x.len() != y.len() {
        return Err(NumericError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(NumericError::CurveTooShort { got: x.len() });
    }
    ensure_finite(x)?;
    ensure_finite(y)?;

    let mut peak_index = 0;
    for (i, &v) in y.iter().enumerate().skip(1) {
        if v > y[peak_index] {
            peak_index = i;
        }
    }

    let height = y[peak_index];
    let half_max = height / 2.0;

    let left_x = y[..peak_index]
        .iter()
        .rposition(|&v| v <= half_max)
        .map_or(x[0], |i| x[i]);
    let right_x = y[peak_index..]
        .iter()
        .position(|&v| v <= half_max)
        .map_or(x[x.len() - 1], |i| x[peak_index + i]);

    Ok(Peak {
        x: x[peak_index],
        height,
        left_x,
        right_x,
        fwhm: right_x - left_x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_peak_width() {
        let x: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let y = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0];
        let peak = analyze_peak(&x, &y).unwrap();
        assert_eq!(peak.x, 5.0);
        assert_eq!(peak.height, 5.0);
        // half max = 2.5: last y <= 2.5 on the left is x=2, first on the right is x=8.
        assert_eq!(peak.left_x, 2.0);
        assert_eq!(peak.right_x, 8.0);
        assert_eq!(peak.fwhm, 6.0);
    }

    #[test]
    fn falls_back_to_boundaries_when_no_crossing() {
        // Monotonically increasing: the peak is the last point and the left side
        // never drops to half maximum.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [6.0, 7.0, 8.0, 9.0];
        let peak = analyze_peak(&x, &y).unwrap();
        assert_eq!(peak.x, 3.0);
        assert_eq!(peak.left_x, 0.0);
        assert_eq!(peak.right_x, 3.0);
        assert_eq!(peak.fwhm, 3.0);
    }

    #[test]
    fn first_maximum_wins_on_ties() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 4.0, 1.0, 4.0, 0.0];
        let peak = analyze_peak(&x, &y).unwrap();
        assert_eq!(peak.x, 1.0);
        assert_eq!(peak.right_x, 2.0);
    }

    #[test]
    fn empty_and_single_point_curves_are_rejected() {
        assert_eq!(
            analyze_peak(&[], &[]).unwrap_err(),
            NumericError::CurveTooShort { got: 0 }
        );
        assert_eq!(
            analyze_peak(&[1.0], &[2.0]).unwrap_err(),
            NumericError::CurveTooShort { got: 1 }
        );
        assert_eq!(
            crate::interp::find_peak(&[1.0], &[2.0]).unwrap_err(),
            NumericError::CurveTooShort { got: 1 }
        );
    }

    #[test]
    fn mismatched_and_nan_curves_are_rejected() {
        assert!(matches!(
            analyze_peak(&[0.0, 1.0], &[1.0]),
            Err(NumericError::LengthMismatch { .. })
        ));
        assert_eq!(
            analyze_peak(&[0.0, 1.0], &[1.0, f64::NAN]).unwrap_err(),
            NumericError::NonFinite { index: 1 }
        );
    }
}
