//! Error types for the analysis core
//!
//! Only precondition violations are errors. Degenerate input (silence, empty
//! spectra, no fundamental) is reported through `None` or zeroed results.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Analysis size must be even and at least 2 (got {0})")]
    InvalidFrameLength(usize),

    #[error("Sample rate must be finite and positive (got {0})")]
    InvalidSampleRate(f64),

    #[error("Spectrogram history capacity must be at least 1")]
    InvalidHistoryCapacity,

    #[error("Filter frequencies must be finite and non-negative (cutoff {cutoff_hz} Hz, bandwidth {bandwidth_hz} Hz)")]
    InvalidFilter { cutoff_hz: f64, bandwidth_hz: f64 },

    #[error("FFT processing failed: {0}")]
    Transform(String),

    #[error("Live analyzer is already running")]
    AlreadyRunning,
}

/// Check that `sample_rate` can be used to map bins and samples to time/frequency.
pub fn check_sample_rate(sample_rate: f64) -> Result<f64, AnalysisError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(AnalysisError::InvalidSampleRate(sample_rate))
    }
}

/// Check that `len` is a valid analysis size (even, at least 2).
pub fn check_frame_length(len: usize) -> Result<usize, AnalysisError> {
    if len >= 2 && len % 2 == 0 {
        Ok(len)
    } else {
        Err(AnalysisError::InvalidFrameLength(len))
    }
}
