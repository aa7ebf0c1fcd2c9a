//! Spectral peak detection

/// A local maximum of a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRecord {
    /// Bin index of the peak
    pub bin: usize,
    /// Magnitude at the peak
    pub magnitude: f32,
}

/// Find the `count` strongest peaks of a magnitude spectrum
///
/// A peak is a strict local maximum: greater than both neighbours. Plateaus
/// do not count, and the first and last bins are never peaks.
///
/// Peaks are ranked by descending magnitude. The sort is stable, so peaks of
/// equal magnitude stay in ascending bin order.
pub fn find_peaks(magnitude: &[f32], count: usize) -> Vec<PeakRecord> {
    if count == 0 {
        return Vec::new();
    }

    let mut peaks: Vec<PeakRecord> = magnitude
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, w)| PeakRecord {
            bin: i + 1,
            magnitude: w[1],
        })
        .collect();

    peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    peaks.truncate(count);
    peaks
}
