//! Python bindings for spectral analysis

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::to_py_err;
use crate::spectrum::{self, find_fundamental, profile_for, total_harmonic_distortion};

pub(super) fn as_slice<'a>(array: &'a PyReadonlyArray1<f32>) -> PyResult<&'a [f32]> {
    array
        .as_slice()
        .map_err(|_| PyValueError::new_err("array must be contiguous"))
}

/// Analyze a buffer
///
/// Args:
///     signal: float32 samples, even length of at least 2
///     sample_rate: Sample rate in Hz
///
/// Returns:
///     Tuple of (magnitude, phase) numpy arrays with len(signal) / 2 bins
#[pyfunction]
pub fn analyze<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f32>,
    sample_rate: f64,
) -> PyResult<(&'py PyArray1<f32>, &'py PyArray1<f32>)> {
    let frame = spectrum::analyze(as_slice(&signal)?, sample_rate).map_err(to_py_err)?;
    let (magnitude, phase) = frame.into_parts();

    Ok((PyArray1::from_vec(py, magnitude), PyArray1::from_vec(py, phase)))
}

/// Remove 2π jumps from a wrapped phase spectrum
#[pyfunction]
pub fn unwrap_phase<'py>(py: Python<'py>, phase: PyReadonlyArray1<f32>) -> PyResult<&'py PyArray1<f32>> {
    Ok(PyArray1::from_vec(py, spectrum::unwrap_phase(as_slice(&phase)?)))
}

/// Strongest local maxima as a list of (bin, magnitude), strongest first
#[pyfunction]
pub fn find_peaks(magnitude: PyReadonlyArray1<f32>, count: usize) -> PyResult<Vec<(usize, f32)>> {
    Ok(spectrum::find_peaks(as_slice(&magnitude)?, count)
        .into_iter()
        .map(|p| (p.bin, p.magnitude))
        .collect())
}

/// Fundamental, harmonic profile and THD of a magnitude spectrum
///
/// Returns:
///     Tuple of (fundamental_bin or None, list of 8 relative amplitudes,
///     THD percent or None)
#[pyfunction]
pub fn harmonic_analysis(magnitude: PyReadonlyArray1<f32>) -> PyResult<(Option<usize>, Vec<f32>, Option<f32>)> {
    let magnitude = as_slice(&magnitude)?;
    let fundamental = find_fundamental(magnitude);
    let profile = profile_for(magnitude, fundamental.as_ref());
    let thd = fundamental
        .as_ref()
        .and_then(|f| total_harmonic_distortion(magnitude, f));

    Ok((fundamental.map(|f| f.bin), profile.as_slice().to_vec(), thd))
}
