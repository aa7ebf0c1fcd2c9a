//! CSV export of time-domain and frequency-domain data

use crate::spectrum::SpectralFrame;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,

    #[error("Failed to write CSV: {0}")]
    Io(#[from] io::Error),
}

/// Write `samples` as `Time (s),Amplitude` rows spread over `duration_s`
pub fn write_time_csv<W: Write>(mut writer: W, samples: &[f32], duration_s: f64) -> Result<(), ExportError> {
    if samples.is_empty() {
        return Err(ExportError::Empty);
    }

    let step = duration_s / samples.len() as f64;
    writeln!(writer, "Time (s),Amplitude")?;
    for (i, &value) in samples.iter().enumerate() {
        writeln!(writer, "{:.6},{:.6}", i as f64 * step, value)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write one `Frequency (Hz),Magnitude,Phase (rad)` row per bin of `frame`
///
/// `phase` is usually the frame's own or unwrapped phase; bins past its end
/// are written as `N/A`.
pub fn write_frequency_csv<W: Write>(mut writer: W, frame: &SpectralFrame, phase: &[f32]) -> Result<(), ExportError> {
    if frame.bin_count() == 0 || phase.is_empty() {
        return Err(ExportError::Empty);
    }

    writeln!(writer, "Frequency (Hz),Magnitude,Phase (rad)")?;
    for (k, &magnitude) in frame.magnitude().iter().enumerate() {
        write!(writer, "{:.2},{:.6},", frame.bin_frequency(k), magnitude)?;
        match phase.get(k) {
            Some(p) => writeln!(writer, "{:.6}", p)?,
            None => writeln!(writer, "N/A")?,
        }
    }

    writer.flush()?;
    Ok(())
}
