//! FFT engine using realfft for real-valued signals
//!
//! Plans once per analysis size and reuses its buffers between passes

use crate::error::{check_frame_length, AnalysisError};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer (also used as scratch by realfft)
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum, fft_size/2 + 1 bins)
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size, must be even and at least 2
    pub fn new(fft_size: usize) -> Result<Self, AnalysisError> {
        let fft_size = check_frame_length(fft_size)?;

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Ok(Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        })
    }

    /// Compute the forward DFT of `signal`
    ///
    /// # Arguments
    /// * `signal` - Exactly `fft_size` samples
    ///
    /// # Returns
    /// Complex spectrum X[k] for k = 0..=fft_size/2
    pub fn transform(&mut self, signal: &[f32]) -> Result<&[Complex<f64>], AnalysisError> {
        if signal.len() != self.fft_size {
            return Err(AnalysisError::InvalidFrameLength(signal.len()));
        }

        for (dst, &src) in self.input_buffer.iter_mut().zip(signal.iter()) {
            *dst = src as f64;
        }

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| AnalysisError::Transform(e.to_string()))?;

        Ok(&self.output_buffer)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(64).unwrap();

        let signal = vec![1.0f32; 64];
        let spectrum = fft.transform(&signal).unwrap();

        assert_eq!(spectrum.len(), 33);
        assert!((spectrum[0].re - 64.0).abs() < 1e-9);
        assert!(spectrum[1..].iter().all(|c| c.norm() < 1e-9));
    }

    #[test]
    fn test_matches_complex_fft() {
        let n = 96;
        let signal: Vec<f32> = (0..n)
            .map(|i| ((0.3 * i as f64).sin() + 0.25 * (1.7 * i as f64 + 0.4).cos()) as f32)
            .collect();

        let mut engine = FftEngine::new(n).unwrap();
        let real = engine.transform(&signal).unwrap().to_vec();

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);
        let mut full: Vec<rustfft::num_complex::Complex<f64>> = signal
            .iter()
            .map(|&x| rustfft::num_complex::Complex::new(x as f64, 0.0))
            .collect();
        fft.process(&mut full);

        for k in 0..=n / 2 {
            assert!((real[k].re - full[k].re).abs() < 1e-9, "re mismatch at {}", k);
            assert!((real[k].im - full[k].im).abs() < 1e-9, "im mismatch at {}", k);
        }
    }

    #[test]
    fn test_matches_naive_dft() {
        let n = 10;
        let signal: Vec<f32> = (0..n).map(|i| (i as f32 * 0.7).cos() - 0.1 * i as f32).collect();

        let mut engine = FftEngine::new(n).unwrap();
        let spectrum = engine.transform(&signal).unwrap();

        for k in 0..=n / 2 {
            let mut re = 0.0;
            let mut im = 0.0;
            for (i, &x) in signal.iter().enumerate() {
                let angle = -2.0 * PI * (k * i) as f64 / n as f64;
                re += x as f64 * angle.cos();
                im += x as f64 * angle.sin();
            }
            assert!((spectrum[k].re - re).abs() < 1e-9);
            assert!((spectrum[k].im - im).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        assert!(FftEngine::new(0).is_err());
        assert!(FftEngine::new(1).is_err());
        assert!(FftEngine::new(7).is_err());

        let mut engine = FftEngine::new(8).unwrap();
        assert_eq!(
            engine.transform(&[0.0; 6]).err(),
            Some(AnalysisError::InvalidFrameLength(6))
        );
    }
}
