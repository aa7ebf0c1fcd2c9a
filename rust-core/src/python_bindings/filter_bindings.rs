//! Python bindings for frequency-domain filtering

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use super::spectrum_bindings::as_slice;
use super::to_py_err;
use crate::filters::{self, FilterKind, FilterSpec};

/// Filter response exposed to Python
#[pyclass(name = "FilterKind")]
#[derive(Clone)]
pub enum PyFilterKind {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

impl From<PyFilterKind> for FilterKind {
    fn from(kind: PyFilterKind) -> Self {
        match kind {
            PyFilterKind::Lowpass => FilterKind::Lowpass,
            PyFilterKind::Highpass => FilterKind::Highpass,
            PyFilterKind::Bandpass => FilterKind::Bandpass,
            PyFilterKind::Notch => FilterKind::Notch,
        }
    }
}

pub(super) fn filter_spec(kind: PyFilterKind, cutoff_hz: f64, bandwidth_hz: f64) -> PyResult<FilterSpec> {
    FilterSpec::new(kind.into(), cutoff_hz, bandwidth_hz).map_err(to_py_err)
}

/// Zero the bins of a magnitude spectrum rejected by a filter
///
/// Args:
///     magnitude: Magnitude spectrum
///     kind: FilterKind
///     cutoff_hz: Cutoff or band centre in Hz
///     bandwidth_hz: Band width in Hz (bandpass/notch)
///     sample_rate: Sample rate of the analysis
///     fft_size: Number of samples the spectrum was computed from
#[pyfunction]
#[pyo3(signature = (magnitude, kind, cutoff_hz, bandwidth_hz, sample_rate, fft_size))]
pub fn apply_filter<'py>(
    py: Python<'py>,
    magnitude: PyReadonlyArray1<f32>,
    kind: PyFilterKind,
    cutoff_hz: f64,
    bandwidth_hz: f64,
    sample_rate: f64,
    fft_size: usize,
) -> PyResult<&'py PyArray1<f32>> {
    let spec = filter_spec(kind, cutoff_hz, bandwidth_hz)?;
    let filtered = filters::apply_filter(as_slice(&magnitude)?, &spec, sample_rate, fft_size);

    Ok(PyArray1::from_vec(py, filtered))
}
