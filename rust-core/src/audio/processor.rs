//! Live analysis loop
//!
//! A capture adapter pushes samples into a ring buffer; a Rust thread cuts
//! them into non-overlapping frames and runs a full workbench pass on each.
//! Readers poll for the latest report and snapshot the history.

use crate::audio::buffer::{sample_channel, SampleProducer};
use crate::config::WorkbenchConfig;
use crate::error::AnalysisError;
use crate::filters::FilterSpec;
use crate::spectrum::SharedHistory;
use crate::workbench::{AnalysisReport, Workbench};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Default ring buffer size in samples (about two seconds at 48 kHz)
pub const DEFAULT_BUFFER_CAPACITY: usize = 96000;

/// Background analyzer fed by a capture adapter
pub struct LiveAnalyzer {
    workbench: Arc<Mutex<Workbench>>,

    /// Latest report, taken by the reader
    report: Arc<Mutex<Option<AnalysisReport>>>,

    history: SharedHistory,
    frames_processed: Arc<AtomicU64>,
    buffer_capacity: usize,
    process_thread: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl LiveAnalyzer {
    pub fn new(config: WorkbenchConfig) -> Result<Self, AnalysisError> {
        let workbench = Workbench::new(config)?;

        Ok(Self {
            history: workbench.history().clone(),
            workbench: Arc::new(Mutex::new(workbench)),
            report: Arc::new(Mutex::new(None)),
            frames_processed: Arc::new(AtomicU64::new(0)),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            process_thread: None,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Ring buffer size used by the next `start`
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Start the analysis thread
    ///
    /// # Returns
    /// The producer end of a fresh ring buffer, for the capture adapter
    pub fn start(&mut self) -> Result<SampleProducer, AnalysisError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(AnalysisError::AlreadyRunning);
        }

        let fft_size = self.fft_size();
        let (producer, mut consumer) = sample_channel(self.buffer_capacity.max(fft_size));

        let workbench = Arc::clone(&self.workbench);
        let report = Arc::clone(&self.report);
        let frames_processed = Arc::clone(&self.frames_processed);
        let running = Arc::clone(&self.running);

        let handle = std::thread::spawn(move || {
            let mut frame = vec![0.0f32; fft_size];
            let mut filled = 0;

            while running.load(Ordering::SeqCst) {
                let n = consumer.read(&mut frame[filled..]);
                filled += n;

                if filled < frame.len() {
                    if n == 0 {
                        // Nothing buffered; back off without adding much latency
                        std::thread::sleep(Duration::from_micros(100));
                    }
                    continue;
                }
                filled = 0;

                let (result, next_size) = {
                    let mut bench = workbench.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    (bench.process(&frame), bench.config().fft_size)
                };

                match result {
                    Ok(new_report) => {
                        *report.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(new_report);
                        frames_processed.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => log::warn!("Dropping live frame: {}", e),
                }

                if next_size != frame.len() {
                    frame.resize(next_size, 0.0);
                }
            }
        });

        self.process_thread = Some(handle);
        log::info!("Live analyzer started with {}-point frames", fft_size);

        Ok(producer)
    }

    /// Stop the analysis thread and wait for it to finish
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            let _ = handle.join();
            log::info!(
                "Live analyzer stopped after {} frames",
                self.frames_processed.load(Ordering::SeqCst)
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Take the latest report, if a frame finished since the last call
    pub fn take_report(&self) -> Option<AnalysisReport> {
        self.report.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take()
    }

    /// Handle to the history the analysis thread publishes into
    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Total frames analyzed since creation
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed.load(Ordering::SeqCst)
    }

    /// Frame size used for the next frame
    pub fn fft_size(&self) -> usize {
        self.with_workbench(|bench| bench.config().fft_size)
    }

    pub fn set_filter(&self, filter: FilterSpec) -> Result<(), AnalysisError> {
        self.with_workbench(|bench| bench.set_filter(filter))
    }

    /// Change the frame size; takes effect after the frame in progress
    pub fn set_fft_size(&self, fft_size: usize) -> Result<(), AnalysisError> {
        self.with_workbench(|bench| bench.set_fft_size(fft_size))
    }

    pub fn set_sample_rate(&self, sample_rate: f64) -> Result<(), AnalysisError> {
        self.with_workbench(|bench| bench.set_sample_rate(sample_rate))
    }

    pub fn set_peak_count(&self, peak_count: usize) {
        self.with_workbench(|bench| bench.set_peak_count(peak_count));
    }

    fn with_workbench<T>(&self, f: impl FnOnce(&mut Workbench) -> T) -> T {
        let mut bench = self.workbench.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut bench)
    }
}

impl Drop for LiveAnalyzer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Tone;
    use std::time::Instant;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn wait_for_report(analyzer: &LiveAnalyzer) -> Option<AnalysisReport> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(report) = analyzer.take_report() {
                return Some(report);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn test_live_pass() {
        init_logging();
        let config = WorkbenchConfig::default();
        let signal = Workbench::new(config.clone())
            .unwrap()
            .synthesize(&[Tone::sine(440.0, 1.0)])
            .unwrap();

        let mut analyzer = LiveAnalyzer::new(config).unwrap();
        let mut producer = analyzer.start().unwrap();
        assert!(analyzer.is_running());
        assert_eq!(producer.write(&signal), signal.len());

        let report = wait_for_report(&analyzer).expect("no report produced");
        assert_eq!(report.fundamental.map(|f| f.bin), Some(10));
        assert_eq!(analyzer.history().len(), 1);

        analyzer.stop();
        assert!(!analyzer.is_running());
        assert_eq!(analyzer.frames_processed(), 1);
    }

    #[test]
    fn test_partial_frame_not_analyzed() {
        init_logging();
        let mut analyzer = LiveAnalyzer::new(WorkbenchConfig::default()).unwrap();
        let mut producer = analyzer.start().unwrap();

        producer.write(&[0.5; 1000]);
        std::thread::sleep(Duration::from_millis(50));
        assert!(analyzer.take_report().is_none());

        producer.write(&[0.5; 24]);
        assert!(wait_for_report(&analyzer).is_some());
    }

    #[test]
    fn test_start_twice_rejected() {
        init_logging();
        let mut analyzer = LiveAnalyzer::new(WorkbenchConfig::default()).unwrap();
        let _producer = analyzer.start().unwrap();

        assert_eq!(analyzer.start().err(), Some(AnalysisError::AlreadyRunning));

        analyzer.stop();
        assert!(analyzer.start().is_ok());
    }

    #[test]
    fn test_fft_size_change_applies_to_next_frame() {
        init_logging();
        let mut analyzer = LiveAnalyzer::new(WorkbenchConfig::default()).unwrap();
        let mut producer = analyzer.start().unwrap();

        analyzer.set_fft_size(256).unwrap();
        assert!(analyzer.set_fft_size(255).is_err());

        producer.write(&[0.0; 1024]);
        let first = wait_for_report(&analyzer).expect("no first report");
        assert_eq!(first.frame.fft_size(), 1024);

        producer.write(&[0.0; 256]);
        let second = wait_for_report(&analyzer).expect("no second report");
        assert_eq!(second.frame.fft_size(), 256);
    }

    #[test]
    fn test_poisoned_workbench_keeps_analyzing() {
        init_logging();
        let mut analyzer = LiveAnalyzer::new(WorkbenchConfig::default()).unwrap();

        let workbench = Arc::clone(&analyzer.workbench);
        let _ = std::thread::spawn(move || {
            let _guard = workbench.lock().unwrap();
            panic!("panic while holding the workbench");
        })
        .join();
        assert!(analyzer.workbench.is_poisoned());

        let mut producer = analyzer.start().unwrap();
        producer.write(&[0.25; 1024]);
        assert!(wait_for_report(&analyzer).is_some());
        assert!(analyzer.is_running());

        producer.write(&[0.25; 1024]);
        assert!(wait_for_report(&analyzer).is_some());
        assert_eq!(analyzer.frames_processed(), 2);
    }

    #[test]
    fn test_drop_stops_thread() {
        init_logging();
        let mut analyzer = LiveAnalyzer::new(WorkbenchConfig::default()).unwrap();
        let running = Arc::clone(&analyzer.running);
        let _producer = analyzer.start().unwrap();

        drop(analyzer);
        assert!(!running.load(Ordering::SeqCst));
    }
}
