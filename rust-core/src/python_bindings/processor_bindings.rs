//! Python bindings for the live analyzer

use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::filter_bindings::{filter_spec, PyFilterKind};
use super::spectrum_bindings::as_slice;
use super::to_py_err;
use super::workbench_bindings::{history_to_list, report_to_dict};
use crate::audio::{LiveAnalyzer, SampleProducer};
use crate::config::WorkbenchConfig;

/// Live analyzer exposed to Python
///
/// Python pushes captured blocks; framing and analysis run in a Rust thread.
#[pyclass(name = "LiveAnalyzer", unsendable)]
pub struct PyLiveAnalyzer {
    analyzer: LiveAnalyzer,
    producer: Option<SampleProducer>,
}

#[pymethods]
impl PyLiveAnalyzer {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self {
            analyzer: LiveAnalyzer::new(WorkbenchConfig::default()).map_err(to_py_err)?,
            producer: None,
        })
    }

    /// Start the analysis thread
    fn start(&mut self) -> PyResult<()> {
        self.producer = Some(self.analyzer.start().map_err(to_py_err)?);
        Ok(())
    }

    fn stop(&mut self) {
        self.analyzer.stop();
        self.producer = None;
    }

    /// Push captured samples
    ///
    /// Returns:
    ///     Number of samples accepted (fewer when the buffer is full)
    fn push(&mut self, samples: PyReadonlyArray1<f32>) -> PyResult<usize> {
        let producer = self
            .producer
            .as_mut()
            .ok_or_else(|| PyRuntimeError::new_err("live analyzer is not running"))?;
        Ok(producer.write(as_slice(&samples)?))
    }

    fn set_filter(&self, kind: PyFilterKind, cutoff_hz: f64, bandwidth_hz: f64) -> PyResult<()> {
        let spec = filter_spec(kind, cutoff_hz, bandwidth_hz)?;
        self.analyzer.set_filter(spec).map_err(to_py_err)
    }

    fn set_fft_size(&self, fft_size: usize) -> PyResult<()> {
        self.analyzer.set_fft_size(fft_size).map_err(to_py_err)
    }

    fn set_sample_rate(&self, sample_rate: f64) -> PyResult<()> {
        self.analyzer.set_sample_rate(sample_rate).map_err(to_py_err)
    }

    /// Latest report as a dictionary, or None if no new frame finished
    fn take_report<'py>(&self, py: Python<'py>) -> PyResult<Option<&'py PyDict>> {
        self.analyzer
            .take_report()
            .map(|report| report_to_dict(py, report))
            .transpose()
    }

    fn history<'py>(&self, py: Python<'py>) -> &'py PyList {
        history_to_list(py, self.analyzer.history())
    }

    fn is_running(&self) -> bool {
        self.analyzer.is_running()
    }
}
