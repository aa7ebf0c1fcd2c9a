//! Frequency-domain masking of magnitude spectra
//!
//! Emulates lowpass/highpass/bandpass/notch responses by zeroing bins of a
//! magnitude spectrum. This is a brick-wall demonstration filter: it works on
//! magnitudes only and never touches the time-domain signal.

use crate::error::AnalysisError;
use crate::spectrum::frame::{frequency_to_bin, SpectralFrame};
use serde::Deserialize;

/// Filter response type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Keep bins at or below the cutoff
    Lowpass,
    /// Keep bins at or above the cutoff
    Highpass,
    /// Keep only the band around the cutoff
    Bandpass,
    /// Remove only the band around the cutoff
    Notch,
}

/// Filter configuration in Hz
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub kind: FilterKind,

    /// Cutoff (lowpass/highpass) or band centre (bandpass/notch) in Hz
    pub cutoff_hz: f64,

    /// Band width in Hz (bandpass/notch only)
    pub bandwidth_hz: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            kind: FilterKind::Lowpass,
            cutoff_hz: 1000.0,
            bandwidth_hz: 200.0,
        }
    }
}

impl FilterSpec {
    pub fn new(kind: FilterKind, cutoff_hz: f64, bandwidth_hz: f64) -> Result<Self, AnalysisError> {
        let spec = Self {
            kind,
            cutoff_hz,
            bandwidth_hz,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Reject negative or non-finite frequencies
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let valid = |hz: f64| hz.is_finite() && hz >= 0.0;
        if valid(self.cutoff_hz) && valid(self.bandwidth_hz) {
            Ok(())
        } else {
            Err(AnalysisError::InvalidFilter {
                cutoff_hz: self.cutoff_hz,
                bandwidth_hz: self.bandwidth_hz,
            })
        }
    }

    /// Cutoff and bandwidth converted to bins of an `fft_size`-point analysis
    pub fn bin_mask(&self, sample_rate: f64, fft_size: usize) -> BinMask {
        let cutoff = frequency_to_bin(self.cutoff_hz, sample_rate, fft_size);
        let bandwidth = frequency_to_bin(self.bandwidth_hz, sample_rate, fft_size);

        // floor(bw/2) below the centre, ceil(bw/2) above it
        BinMask {
            kind: self.kind,
            cutoff,
            lower: cutoff.saturating_sub(bandwidth.div_euclid(2)),
            upper: cutoff.saturating_add(bandwidth.div_euclid(2) + bandwidth.rem_euclid(2)),
        }
    }
}

/// A filter spec resolved to bin indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinMask {
    pub kind: FilterKind,
    pub cutoff: i64,
    /// Inclusive lower edge of the bandpass/notch band
    pub lower: i64,
    /// Inclusive upper edge of the bandpass/notch band
    pub upper: i64,
}

impl BinMask {
    /// Whether bin `i` passes the filter
    pub fn passes(&self, i: i64) -> bool {
        let in_band = i >= self.lower && i <= self.upper;
        match self.kind {
            FilterKind::Lowpass => i <= self.cutoff,
            FilterKind::Highpass => i >= self.cutoff,
            FilterKind::Bandpass => in_band,
            FilterKind::Notch => !in_band,
        }
    }
}

/// Apply a filter to a magnitude spectrum
///
/// # Arguments
/// * `magnitude` - Magnitude spectrum (left untouched)
/// * `spec` - Filter configuration
/// * `sample_rate` - Sample rate the spectrum was computed at
/// * `fft_size` - Number of samples the spectrum was computed from
///
/// # Returns
/// Copy of `magnitude` with every rejected bin set to 0
pub fn apply_filter(magnitude: &[f32], spec: &FilterSpec, sample_rate: f64, fft_size: usize) -> Vec<f32> {
    let mask = spec.bin_mask(sample_rate, fft_size);

    magnitude
        .iter()
        .enumerate()
        .map(|(i, &m)| if mask.passes(i as i64) { m } else { 0.0 })
        .collect()
}

/// Apply a filter to the magnitude of `frame`, using its own size and rate
pub fn filter_frame(frame: &SpectralFrame, spec: &FilterSpec) -> Vec<f32> {
    apply_filter(frame.magnitude(), spec, frame.sample_rate(), frame.fft_size())
}
