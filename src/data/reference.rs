//! Built-in neutron resonance scattering measurements.
//!
//! Nine cross-section samples around a single resonance, used when no sample
//! file is supplied.

use crate::domain::DataPoint;

/// Incident neutron energy (MeV).
pub const ENERGY_MEV: [f64; 9] = [0.0, 25.0, 50.0, 75.0, 100.0, 125.0, 150.0, 175.0, 200.0];

/// Measured cross section (mb).
pub const CROSS_SECTION_MB: [f64; 9] = [10.6, 16.0, 45.0, 83.5, 52.8, 19.9, 10.8, 8.25, 4.7];

/// The reference samples as points.
pub fn reference_samples() -> Vec<DataPoint> {
    ENERGY_MEV
        .iter()
        .zip(CROSS_SECTION_MB.iter())
        .map(|(&x, &y)| DataPoint { x, y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_samples_are_sorted_and_complete() {
        let samples = reference_samples();
        assert_eq!(samples.len(), 9);
        assert!(samples.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(samples[2], DataPoint { x: 50.0, y: 45.0 });
    }
}
