//! Spectral analysis with FFT

pub mod analysis;
pub mod components;
pub mod fft;
pub mod frame;
pub mod harmonics;
pub mod history;
pub mod peaks;
pub mod phase;

pub use analysis::{analyze, SpectrumAnalyzer};
pub use components::{reconstruct_components, ComponentWave};
pub use fft::FftEngine;
pub use frame::{bin_count, frequency_to_bin, SpectralFrame};
pub use harmonics::{
    find_fundamental, harmonic_profile, profile_for, total_harmonic_distortion, Fundamental, HarmonicProfile,
    HARMONIC_COUNT,
};
pub use history::{SharedHistory, SpectrogramHistory, DEFAULT_HISTORY_CAPACITY};
pub use peaks::{find_peaks, PeakRecord};
pub use phase::unwrap_phase;
