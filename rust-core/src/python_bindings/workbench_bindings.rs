//! Python bindings for the analysis workbench

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::filter_bindings::{filter_spec, PyFilterKind};
use super::spectrum_bindings::as_slice;
use super::to_py_err;
use crate::config::WorkbenchConfig;
use crate::signal::{Tone, WaveformKind};
use crate::spectrum::SharedHistory;
use crate::workbench::{AnalysisReport, Workbench};

/// Waveform shape exposed to Python
#[pyclass(name = "WaveformKind")]
#[derive(Clone)]
pub enum PyWaveformKind {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl From<PyWaveformKind> for WaveformKind {
    fn from(kind: PyWaveformKind) -> Self {
        match kind {
            PyWaveformKind::Sine => WaveformKind::Sine,
            PyWaveformKind::Square => WaveformKind::Square,
            PyWaveformKind::Triangle => WaveformKind::Triangle,
            PyWaveformKind::Sawtooth => WaveformKind::Sawtooth,
        }
    }
}

/// Convert a report into a dict of numpy arrays and plain values
pub(super) fn report_to_dict<'py>(py: Python<'py>, report: AnalysisReport) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);

    dict.set_item("frequencies", PyArray1::from_vec(py, report.frame.frequency_axis()))?;
    dict.set_item("sample_rate", report.frame.sample_rate())?;
    dict.set_item("fft_size", report.frame.fft_size())?;
    dict.set_item("unwrapped_phase", PyArray1::from_vec(py, report.unwrapped_phase))?;
    dict.set_item(
        "peaks",
        report.peaks.iter().map(|p| (p.bin, p.magnitude)).collect::<Vec<_>>(),
    )?;
    dict.set_item("fundamental_bin", report.fundamental.map(|f| f.bin))?;
    dict.set_item("harmonics", report.harmonics.as_slice().to_vec())?;
    dict.set_item("thd_percent", report.thd_percent)?;
    dict.set_item("filtered_magnitude", PyArray1::from_vec(py, report.filtered_magnitude))?;

    if let Some(stats) = report.statistics {
        dict.set_item("rms", stats.rms)?;
        dict.set_item("peak", stats.peak)?;
        dict.set_item("crest_factor", stats.crest_factor)?;
    }

    let components = PyList::empty(py);
    for wave in report.components {
        let entry = PyDict::new(py);
        entry.set_item("bin", wave.bin)?;
        entry.set_item("frequency_hz", wave.frequency_hz)?;
        entry.set_item("amplitude", wave.amplitude)?;
        entry.set_item("phase_rad", wave.phase_rad)?;
        entry.set_item("samples", PyArray1::from_vec(py, wave.samples))?;
        components.append(entry)?;
    }
    dict.set_item("components", components)?;

    let (magnitude, phase) = report.frame.into_parts();
    dict.set_item("magnitude", PyArray1::from_vec(py, magnitude))?;
    dict.set_item("phase", PyArray1::from_vec(py, phase))?;

    Ok(dict)
}

/// History snapshot as a list of numpy arrays, oldest first
pub(super) fn history_to_list<'py>(py: Python<'py>, history: &SharedHistory) -> &'py PyList {
    PyList::new(py, history.snapshot().iter().map(|frame| PyArray1::from_slice(py, frame)))
}

/// Analysis workbench exposed to Python
#[pyclass(name = "Workbench")]
pub struct PyWorkbench {
    workbench: Workbench,
}

#[pymethods]
impl PyWorkbench {
    /// Create a workbench
    ///
    /// Args:
    ///     config_path: Optional TOML file; defaults are used otherwise
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<&str>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => WorkbenchConfig::load(path)
                .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?,
            None => WorkbenchConfig::default(),
        };

        Ok(Self {
            workbench: Workbench::new(config).map_err(to_py_err)?,
        })
    }

    /// Run a full analysis pass over a buffer
    ///
    /// Returns:
    ///     Dictionary with spectra, peaks, harmonics, statistics and components
    fn process<'py>(&mut self, py: Python<'py>, signal: PyReadonlyArray1<f32>) -> PyResult<&'py PyDict> {
        let report = self.workbench.process(as_slice(&signal)?).map_err(to_py_err)?;
        report_to_dict(py, report)
    }

    /// Synthesize a composite of (kind, frequency_hz, amplitude, phase_rad) tones
    fn synthesize<'py>(
        &self,
        py: Python<'py>,
        tones: Vec<(PyWaveformKind, f64, f64, f64)>,
    ) -> PyResult<&'py PyArray1<f32>> {
        let tones: Vec<Tone> = tones
            .into_iter()
            .map(|(kind, freq, amp, phase)| Tone::new(kind.into(), freq, amp, phase))
            .collect();

        let signal = self.workbench.synthesize(&tones).map_err(to_py_err)?;
        Ok(PyArray1::from_vec(py, signal))
    }

    fn set_filter(&mut self, kind: PyFilterKind, cutoff_hz: f64, bandwidth_hz: f64) -> PyResult<()> {
        let spec = filter_spec(kind, cutoff_hz, bandwidth_hz)?;
        self.workbench.set_filter(spec).map_err(to_py_err)
    }

    fn set_sample_rate(&mut self, sample_rate: f64) -> PyResult<()> {
        self.workbench.set_sample_rate(sample_rate).map_err(to_py_err)
    }

    fn set_fft_size(&mut self, fft_size: usize) -> PyResult<()> {
        self.workbench.set_fft_size(fft_size).map_err(to_py_err)
    }

    fn set_peak_count(&mut self, peak_count: usize) {
        self.workbench.set_peak_count(peak_count);
    }

    /// Spectrogram history, oldest frame first
    fn history<'py>(&self, py: Python<'py>) -> &'py PyList {
        history_to_list(py, self.workbench.history())
    }
}
