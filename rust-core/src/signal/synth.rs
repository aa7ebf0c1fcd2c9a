//! Periodic waveform synthesis
//!
//! Waveforms are evaluated in double precision and accumulated into `f32`
//! sample buffers. Every call adds to the buffer, so several tones can be
//! layered into one composite signal.

use crate::error::{check_sample_rate, AnalysisError};
use serde::Deserialize;
use std::f64::consts::PI;

/// Periodic waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformKind {
    Sine,
    /// Sign of the sine: +A, -A, or 0 exactly at zero crossings
    Square,
    Triangle,
    /// Rising ramp from -A to +A once per period
    Sawtooth,
}

/// One periodic component of a signal
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Tone {
    pub kind: WaveformKind,

    /// Frequency in Hz
    pub frequency_hz: f64,

    /// Peak amplitude
    pub amplitude: f64,

    /// Phase offset in radians
    #[serde(default)]
    pub phase_rad: f64,
}

impl Tone {
    pub fn new(kind: WaveformKind, frequency_hz: f64, amplitude: f64, phase_rad: f64) -> Self {
        Self {
            kind,
            frequency_hz,
            amplitude,
            phase_rad,
        }
    }

    pub fn sine(frequency_hz: f64, amplitude: f64) -> Self {
        Self::new(WaveformKind::Sine, frequency_hz, amplitude, 0.0)
    }

    /// Waveform value at time `t` seconds
    pub fn value_at(&self, t: f64) -> f64 {
        let a = self.amplitude;
        match self.kind {
            WaveformKind::Sine => a * self.angle(t).sin(),
            WaveformKind::Square => a * sign(self.angle(t).sin()),
            WaveformKind::Triangle => {
                let u = (self.frequency_hz * t + self.phase_rad / (2.0 * PI)) % 1.0;
                a * (2.0 * (2.0 * (u - (u + 0.5).floor())).abs() - 1.0)
            }
            WaveformKind::Sawtooth => {
                let u = (t * self.frequency_hz + self.phase_rad / (2.0 * PI)) % 1.0;
                a * (2.0 * u - 1.0)
            }
        }
    }

    #[inline]
    fn angle(&self, t: f64) -> f64 {
        2.0 * PI * self.frequency_hz * t + self.phase_rad
    }
}

/// `f64::signum` maps 0.0 to 1.0; square waves need 0 at zero crossings.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Add one waveform to `buffer`
///
/// Sample `i` is taken at `t = i / sample_rate`. Parameters are assumed finite
/// and already range-checked by the caller.
pub fn add_waveform(buffer: &mut [f32], sample_rate: f64, tone: &Tone) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample = (*sample as f64 + tone.value_at(t)) as f32;
    }
}

/// Rescale `buffer` so its peak magnitude equals `ceiling`
///
/// Only applies when `ceiling > 0` and the peak exceeds it.
///
/// # Returns
/// The applied scale factor (1.0 when untouched)
pub fn limit_peak(buffer: &mut [f32], ceiling: f64) -> f64 {
    let peak = buffer.iter().fold(0.0f64, |m, &x| m.max((x as f64).abs()));

    if ceiling > 0.0 && peak > ceiling {
        let scale = ceiling / peak;
        for s in buffer.iter_mut() {
            *s = (*s as f64 * scale) as f32;
        }
        scale
    } else {
        1.0
    }
}

/// Sum `tones` into a zeroed `buffer`, then limit the peak to `ceiling`
pub fn synthesize_composite(buffer: &mut [f32], sample_rate: f64, tones: &[Tone], ceiling: f64) {
    buffer.fill(0.0);
    for tone in tones {
        add_waveform(buffer, sample_rate, tone);
    }
    limit_peak(buffer, ceiling);
}

/// Buffer-producing synthesizer with a validated sample rate and length
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    sample_rate: f64,
    len: usize,
}

impl SignalGenerator {
    /// Create a generator for buffers of `len` samples at `sample_rate` Hz
    pub fn new(sample_rate: f64, len: usize) -> Result<Self, AnalysisError> {
        Ok(Self {
            sample_rate: check_sample_rate(sample_rate)?,
            len,
        })
    }

    /// Generate a single tone
    pub fn generate(&self, tone: &Tone) -> Vec<f32> {
        let mut buffer = vec![0.0; self.len];
        add_waveform(&mut buffer, self.sample_rate, tone);
        buffer
    }

    /// Generate the sum of `tones`, peak-limited to `ceiling`
    pub fn generate_composite(&self, tones: &[Tone], ceiling: f64) -> Vec<f32> {
        let mut buffer = vec![0.0; self.len];
        synthesize_composite(&mut buffer, self.sample_rate, tones, ceiling);
        buffer
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Duration of one generated buffer in seconds
    pub fn duration(&self) -> f64 {
        self.len as f64 / self.sample_rate
    }
}
