//! Signal sources: synthesis, recording fitting and time-domain statistics

pub mod synth;
pub mod fit;
pub mod stats;

pub use synth::{add_waveform, limit_peak, synthesize_composite, SignalGenerator, Tone, WaveformKind};
pub use fit::{
    effective_sample_rate, fit_timed_samples, fit_to_length, parse_timed_csv, truncate_or_pad, FittedSignal, TimedSample,
};
pub use stats::SignalStatistics;
