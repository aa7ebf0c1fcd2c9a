//! Workbench configuration loaded from TOML
//!
//! ```toml
//! sample_rate = 48000.0
//! fft_size = 2048
//! peak_count = 5
//!
//! [filter]
//! kind = "notch"
//! cutoff_hz = 50.0
//! bandwidth_hz = 10.0
//! ```

use crate::error::{check_frame_length, check_sample_rate, AnalysisError};
use crate::filters::FilterSpec;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] AnalysisError),
}

/// Analysis parameters for a [`Workbench`](crate::Workbench)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkbenchConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_peak_count")]
    pub peak_count: usize,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Peak ceiling for composite synthesis
    #[serde(default = "default_composite_ceiling")]
    pub composite_ceiling: f64,
    #[serde(default)]
    pub filter: FilterSpec,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            fft_size: default_fft_size(),
            peak_count: default_peak_count(),
            history_capacity: default_history_capacity(),
            composite_ceiling: default_composite_ceiling(),
            filter: FilterSpec::default(),
        }
    }
}

fn default_sample_rate() -> f64 { 44100.0 }
fn default_fft_size() -> usize { 1024 }
fn default_peak_count() -> usize { 5 }
fn default_history_capacity() -> usize { 100 }
fn default_composite_ceiling() -> f64 { 1.0 }

impl WorkbenchConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded workbench config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        check_sample_rate(self.sample_rate)?;
        check_frame_length(self.fft_size)?;
        if self.history_capacity == 0 {
            return Err(AnalysisError::InvalidHistoryCapacity);
        }
        self.filter.validate()
    }
}
