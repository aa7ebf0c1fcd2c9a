//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::AnalysisError;

mod filter_bindings;
mod processor_bindings;
mod spectrum_bindings;
mod workbench_bindings;

fn to_py_err(e: AnalysisError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python module definition
#[pymodule]
fn spectrum_explorer(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<filter_bindings::PyFilterKind>()?;
    m.add_class::<workbench_bindings::PyWaveformKind>()?;
    m.add_class::<workbench_bindings::PyWorkbench>()?;
    m.add_class::<processor_bindings::PyLiveAnalyzer>()?;

    m.add_function(wrap_pyfunction!(spectrum_bindings::analyze, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::unwrap_phase, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::find_peaks, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::harmonic_analysis, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::apply_filter, m)?)?;

    Ok(())
}
