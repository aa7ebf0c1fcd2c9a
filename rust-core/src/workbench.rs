//! One-call analysis pipeline
//!
//! Owns the analyzer, the current parameters and the spectrogram history.
//! Each pass runs estimation, phase unwrapping, peak picking, harmonic
//! analysis, filtering and statistics over one buffer.

use crate::config::WorkbenchConfig;
use crate::error::{check_frame_length, AnalysisError};
use crate::filters::{filter_frame, FilterSpec};
use crate::signal::{fit_timed_samples, SignalGenerator, SignalStatistics, TimedSample, Tone};
use crate::spectrum::{
    find_fundamental, find_peaks, profile_for, reconstruct_components, total_harmonic_distortion, unwrap_phase,
    ComponentWave, Fundamental, HarmonicProfile, PeakRecord, SharedHistory, SpectralFrame, SpectrumAnalyzer,
};

/// Everything derived from one analysis pass
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub frame: SpectralFrame,
    pub unwrapped_phase: Vec<f32>,
    /// Strongest peaks, descending magnitude
    pub peaks: Vec<PeakRecord>,
    pub fundamental: Option<Fundamental>,
    pub harmonics: HarmonicProfile,
    /// THD in percent, `None` when not applicable
    pub thd_percent: Option<f32>,
    /// Magnitude spectrum after the configured filter
    pub filtered_magnitude: Vec<f32>,
    pub statistics: Option<SignalStatistics>,
    /// Peaks rebuilt as sines over the analyzed buffer
    pub components: Vec<ComponentWave>,
}

/// Stateful analysis pipeline
pub struct Workbench {
    config: WorkbenchConfig,
    analyzer: SpectrumAnalyzer,
    history: SharedHistory,
}

impl Workbench {
    pub fn new(config: WorkbenchConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config.sample_rate)?,
            history: SharedHistory::with_capacity(config.history_capacity)?,
            config,
        })
    }

    /// Analyze one buffer sampled at the configured rate
    ///
    /// The analysis size is `samples.len()`. The magnitude spectrum is
    /// appended to the history.
    pub fn process(&mut self, samples: &[f32]) -> Result<AnalysisReport, AnalysisError> {
        let sample_rate = self.config.sample_rate;
        self.run(samples, sample_rate)
    }

    /// Fit a timestamped recording to the configured size and analyze it
    ///
    /// The pass uses the recording's effective sample rate instead of the
    /// configured one.
    pub fn process_recording(&mut self, samples: &[TimedSample]) -> Result<AnalysisReport, AnalysisError> {
        let fitted = fit_timed_samples(samples, self.config.fft_size);
        self.run(&fitted.samples, fitted.sample_rate)
    }

    fn run(&mut self, samples: &[f32], sample_rate: f64) -> Result<AnalysisReport, AnalysisError> {
        if self.analyzer.sample_rate() != sample_rate {
            self.analyzer.set_sample_rate(sample_rate)?;
        }

        let frame = self.analyzer.analyze(samples)?;
        let magnitude = frame.magnitude();

        let unwrapped_phase = unwrap_phase(frame.phase());
        let peaks = find_peaks(magnitude, self.config.peak_count);

        let fundamental = find_fundamental(magnitude);
        let harmonics = profile_for(magnitude, fundamental.as_ref());
        let thd_percent = fundamental
            .as_ref()
            .and_then(|f| total_harmonic_distortion(magnitude, f));

        let filtered_magnitude = filter_frame(&frame, &self.config.filter);
        let statistics = SignalStatistics::compute(samples, magnitude);
        let components = reconstruct_components(&frame, &unwrapped_phase, &peaks, samples.len());

        self.history.push(magnitude);

        log::debug!(
            "Analyzed {} samples at {} Hz: fundamental bin {:?}, {} peaks",
            samples.len(),
            sample_rate,
            fundamental.map(|f| f.bin),
            peaks.len()
        );

        Ok(AnalysisReport {
            frame,
            unwrapped_phase,
            peaks,
            fundamental,
            harmonics,
            thd_percent,
            filtered_magnitude,
            statistics,
            components,
        })
    }

    /// Synthesize `tones` into a buffer of the configured size and rate
    pub fn synthesize(&self, tones: &[Tone]) -> Result<Vec<f32>, AnalysisError> {
        let generator = SignalGenerator::new(self.config.sample_rate, self.config.fft_size)?;
        Ok(generator.generate_composite(tones, self.config.composite_ceiling))
    }

    pub fn set_filter(&mut self, filter: FilterSpec) -> Result<(), AnalysisError> {
        filter.validate()?;
        self.config.filter = filter;
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), AnalysisError> {
        self.analyzer.set_sample_rate(sample_rate)?;
        self.config.sample_rate = sample_rate;
        Ok(())
    }

    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), AnalysisError> {
        self.config.fft_size = check_frame_length(fft_size)?;
        Ok(())
    }

    pub fn set_peak_count(&mut self, peak_count: usize) {
        self.config.peak_count = peak_count;
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    /// Handle to the spectrogram history fed by every pass
    pub fn history(&self) -> &SharedHistory {
        &self.history
    }
}
