//! Single-sided spectral frame
//!
//! A frame is the magnitude and wrapped phase of one analysis pass over `N`
//! samples. It holds `N/2` bins: DC up to, but not including, `N/2`. All
//! conversions between sample counts, bins and Hz go through this type.

/// Number of single-sided bins produced from `fft_size` samples
#[inline]
pub fn bin_count(fft_size: usize) -> usize {
    fft_size / 2
}

/// Magnitude and phase spectra of one analysis pass
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    magnitude: Vec<f32>,
    phase: Vec<f32>,
    fft_size: usize,
    sample_rate: f64,
}

impl SpectralFrame {
    /// Frames are only built by the spectral estimator, which guarantees
    /// `magnitude.len() == phase.len() == fft_size / 2`.
    pub(crate) fn new(magnitude: Vec<f32>, phase: Vec<f32>, fft_size: usize, sample_rate: f64) -> Self {
        debug_assert_eq!(magnitude.len(), bin_count(fft_size));
        debug_assert_eq!(phase.len(), bin_count(fft_size));

        Self {
            magnitude,
            phase,
            fft_size,
            sample_rate,
        }
    }

    /// Normalized single-sided magnitude spectrum
    pub fn magnitude(&self) -> &[f32] {
        &self.magnitude
    }

    /// Wrapped phase spectrum in radians, range [-π, π]
    pub fn phase(&self) -> &[f32] {
        &self.phase
    }

    /// Number of samples the frame was computed from
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn bin_count(&self) -> usize {
        self.magnitude.len()
    }

    /// Frequency in Hz of `bin`
    pub fn bin_frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate / self.fft_size as f64
    }

    /// Nearest bin to `frequency_hz` (may lie outside the frame)
    pub fn frequency_bin(&self, frequency_hz: f64) -> i64 {
        frequency_to_bin(frequency_hz, self.sample_rate, self.fft_size)
    }

    /// Frequency of every bin in Hz
    pub fn frequency_axis(&self) -> Vec<f64> {
        (0..self.bin_count()).map(|k| self.bin_frequency(k)).collect()
    }

    /// Bin spacing in Hz
    pub fn resolution(&self) -> f64 {
        self.sample_rate / self.fft_size as f64
    }

    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>) {
        (self.magnitude, self.phase)
    }
}

/// Nearest bin index for `frequency_hz` in an `fft_size`-point analysis
pub fn frequency_to_bin(frequency_hz: f64, sample_rate: f64, fft_size: usize) -> i64 {
    (frequency_hz * fft_size as f64 / sample_rate).round() as i64
}
