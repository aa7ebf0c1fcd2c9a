//! High-level spectrum analyzer
//!
//! Turns a buffer of N samples into a normalized single-sided spectral frame.
//! No window is applied: the transform sees the raw buffer.

use super::fft::FftEngine;
use super::frame::{bin_count, SpectralFrame};
use crate::error::{check_frame_length, check_sample_rate, AnalysisError};

/// Real-time spectrum analyzer
///
/// Keeps the FFT plan of the most recent analysis size, so repeated passes
/// at a fixed size do not re-plan.
pub struct SpectrumAnalyzer {
    sample_rate: f64,
    fft_engine: Option<FftEngine>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer for signals sampled at `sample_rate` Hz
    pub fn new(sample_rate: f64) -> Result<Self, AnalysisError> {
        Ok(Self {
            sample_rate: check_sample_rate(sample_rate)?,
            fft_engine: None,
        })
    }

    /// Analyze a buffer and return its spectral frame
    ///
    /// The analysis size is `signal.len()`, which must be even and at least 2.
    ///
    /// # Returns
    /// Frame with `signal.len() / 2` bins where
    /// `magnitude[k] = |X[k]| / N`, doubled for `0 < k < N/2 - 1`,
    /// and `phase[k] = atan2(Im X[k], Re X[k])`
    pub fn analyze(&mut self, signal: &[f32]) -> Result<SpectralFrame, AnalysisError> {
        let fft_size = check_frame_length(signal.len())?;
        let engine = self.engine_for(fft_size)?;
        let spectrum = engine.transform(signal)?;

        let bins = bin_count(fft_size);
        let norm = fft_size as f64;
        let mut magnitude = Vec::with_capacity(bins);
        let mut phase = Vec::with_capacity(bins);

        for (k, x) in spectrum.iter().take(bins).enumerate() {
            let mut mag = x.norm() / norm;
            // Single-sided correction; DC and the last bin have no mirror image
            if k > 0 && k + 1 < bins {
                mag *= 2.0;
            }
            magnitude.push(mag as f32);

            // atan2(±0, -0) is ±π; an empty bin has no phase
            let angle = if x.re == 0.0 && x.im == 0.0 { 0.0 } else { x.im.atan2(x.re) };
            phase.push(angle as f32);
        }

        Ok(SpectralFrame::new(magnitude, phase, fft_size, self.sample_rate))
    }

    fn engine_for(&mut self, fft_size: usize) -> Result<&mut FftEngine, AnalysisError> {
        let engine = match self.fft_engine.take() {
            Some(engine) if engine.fft_size() == fft_size => engine,
            _ => {
                log::debug!("Planning {}-point FFT", fft_size);
                FftEngine::new(fft_size)?
            }
        };

        Ok(self.fft_engine.insert(engine))
    }

    /// Update the sample rate used to label frames
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), AnalysisError> {
        self.sample_rate = check_sample_rate(sample_rate)?;
        Ok(())
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Size of the currently planned FFT, if any
    pub fn fft_size(&self) -> Option<usize> {
        self.fft_engine.as_ref().map(FftEngine::fft_size)
    }
}

/// One-shot analysis without keeping a planned FFT around
pub fn analyze(signal: &[f32], sample_rate: f64) -> Result<SpectralFrame, AnalysisError> {
    SpectrumAnalyzer::new(sample_rate)?.analyze(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{SignalGenerator, Tone, WaveformKind};
    use std::f32::consts::PI;

    fn argmax(data: &[f32]) -> usize {
        data.iter()
            .enumerate()
            .fold((0, f32::MIN), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
            .0
    }

    #[test]
    fn test_bin_aligned_sine() {
        for &(n, k) in &[(16usize, 3usize), (64, 5), (256, 17), (1024, 100)] {
            let sample_rate = 8000.0;
            let freq = k as f64 * sample_rate / n as f64;
            let signal = SignalGenerator::new(sample_rate, n)
                .unwrap()
                .generate(&Tone::sine(freq, 0.75));

            let frame = analyze(&signal, sample_rate).unwrap();
            assert_eq!(frame.bin_count(), n / 2);
            assert_eq!(frame.phase().len(), n / 2);
            assert_eq!(argmax(frame.magnitude()), k);
            assert!((frame.magnitude()[k] - 0.75).abs() < 1e-3, "n={} k={}", n, k);
        }
    }

    #[test]
    fn test_sine_and_cosine_phase() {
        let gen = SignalGenerator::new(1024.0, 1024).unwrap();

        let cosine = gen.generate(&Tone::new(WaveformKind::Sine, 32.0, 1.0, PI as f64 / 2.0));
        let frame = analyze(&cosine, 1024.0).unwrap();
        assert!(frame.phase()[32].abs() < 1e-3);

        let sine = gen.generate(&Tone::sine(32.0, 1.0));
        let frame = analyze(&sine, 1024.0).unwrap();
        assert!((frame.phase()[32] + PI / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_dc_and_last_bin_not_doubled() {
        // Constant 1.0 puts everything in DC
        let frame = analyze(&[1.0; 8], 8.0).unwrap();
        assert!((frame.magnitude()[0] - 1.0).abs() < 1e-6);

        // Bin N/2 - 1 = 3 for N = 8: cos(2π·3i/8) has |X[3]| = N/2
        let signal: Vec<f32> = (0..8)
            .map(|i| (2.0 * PI * 3.0 * i as f32 / 8.0).cos())
            .collect();
        let frame = analyze(&signal, 8.0).unwrap();
        assert!((frame.magnitude()[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_silence() {
        let frame = analyze(&[0.0; 64], 44100.0).unwrap();
        assert!(frame.magnitude().iter().all(|&m| m == 0.0));
        assert!(frame.phase().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_minimum_size() {
        let frame = analyze(&[0.5, 0.5], 2.0).unwrap();
        assert_eq!(frame.bin_count(), 1);
        assert!((frame.magnitude()[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(analyze(&[0.0; 7], 44100.0), Err(AnalysisError::InvalidFrameLength(7)));
        assert_eq!(analyze(&[0.0], 44100.0), Err(AnalysisError::InvalidFrameLength(1)));
        assert_eq!(analyze(&[], 44100.0), Err(AnalysisError::InvalidFrameLength(0)));
        assert_eq!(analyze(&[0.0; 8], -1.0), Err(AnalysisError::InvalidSampleRate(-1.0)));
    }

    #[test]
    fn test_replans_on_size_change() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0).unwrap();
        assert_eq!(analyzer.fft_size(), None);

        analyzer.analyze(&[0.0; 256]).unwrap();
        assert_eq!(analyzer.fft_size(), Some(256));

        let frame = analyzer.analyze(&[0.0; 2048]).unwrap();
        assert_eq!(analyzer.fft_size(), Some(2048));
        assert_eq!(frame.bin_count(), 1024);
    }
}
