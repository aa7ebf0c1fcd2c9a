//! Time-domain signal statistics

use crate::spectrum::harmonics::{find_fundamental, total_harmonic_distortion};

/// RMS below which the crest factor is reported as 0
const CREST_RMS_FLOOR: f32 = 1e-9;

/// Summary statistics for one analysis pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStatistics {
    pub rms: f32,
    pub peak: f32,
    /// Peak-to-RMS ratio, 0 for silent buffers
    pub crest_factor: f32,
    /// THD in percent, `None` when no fundamental is present
    pub thd_percent: Option<f32>,
}

impl SignalStatistics {
    /// Compute statistics for `samples` and their magnitude spectrum
    ///
    /// # Returns
    /// `None` for an empty buffer
    pub fn compute(samples: &[f32], magnitude: &[f32]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let (sum_sq, peak) = samples.iter().fold((0.0f64, 0.0f32), |(sum, peak), &x| {
            (sum + (x as f64) * (x as f64), peak.max(x.abs()))
        });
        let rms = (sum_sq / samples.len() as f64).sqrt() as f32;
        let crest_factor = if rms > CREST_RMS_FLOOR { peak / rms } else { 0.0 };

        let thd_percent = find_fundamental(magnitude)
            .and_then(|fundamental| total_harmonic_distortion(magnitude, &fundamental));

        Some(Self {
            rms,
            peak,
            crest_factor,
            thd_percent,
        })
    }
}
