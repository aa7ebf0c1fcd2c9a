//! Per-peak component breakdown
//!
//! Rebuilds each detected peak as a pure sine so a view can overlay the
//! components that make up the analyzed signal.

use super::frame::SpectralFrame;
use super::peaks::PeakRecord;
use crate::signal::{add_waveform, Tone, WaveformKind};

/// Peaks at or below this magnitude are not reconstructed
pub const COMPONENT_FLOOR: f32 = 1e-4;

/// One reconstructed sinusoidal component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentWave {
    pub bin: usize,
    pub frequency_hz: f64,
    pub amplitude: f32,
    pub phase_rad: f32,
    pub samples: Vec<f32>,
}

/// Rebuild the significant peaks of `frame` as sines of `len` samples
///
/// Each component uses the peak magnitude as amplitude and the unwrapped
/// phase of its bin (0 when `unwrapped_phase` is shorter than the frame).
/// Components keep the order of `peaks`.
pub fn reconstruct_components(
    frame: &SpectralFrame,
    unwrapped_phase: &[f32],
    peaks: &[PeakRecord],
    len: usize,
) -> Vec<ComponentWave> {
    peaks
        .iter()
        .filter(|p| p.magnitude > COMPONENT_FLOOR)
        .map(|p| {
            let frequency_hz = frame.bin_frequency(p.bin);
            let phase_rad = unwrapped_phase.get(p.bin).copied().unwrap_or(0.0);
            let tone = Tone::new(WaveformKind::Sine, frequency_hz, p.magnitude as f64, phase_rad as f64);

            let mut samples = vec![0.0; len];
            add_waveform(&mut samples, frame.sample_rate(), &tone);

            ComponentWave {
                bin: p.bin,
                frequency_hz,
                amplitude: p.magnitude,
                phase_rad,
                samples,
            }
        })
        .collect()
}
