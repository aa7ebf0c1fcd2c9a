//! Spectrum Explorer - Real-Time Signal Analysis Core
//!
//! Waveform synthesis, single-sided spectral estimation, phase unwrapping,
//! peak and harmonic analysis, frequency-domain filtering and a rolling
//! spectrogram history, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod audio;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod signal;
pub mod spectrum;
pub mod workbench;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::LiveAnalyzer;
pub use config::{ConfigError, WorkbenchConfig};
pub use error::AnalysisError;
pub use filters::{FilterKind, FilterSpec};
pub use signal::{Tone, WaveformKind};
pub use spectrum::{SharedHistory, SpectralFrame, SpectrogramHistory, SpectrumAnalyzer};
pub use workbench::{AnalysisReport, Workbench};
