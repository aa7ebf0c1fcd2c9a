//! Rolling spectrogram history
//!
//! A bounded FIFO of magnitude frames, oldest first. Frames may differ in
//! width when the analysis size changes between pushes; readers must use each
//! frame's own length.

use crate::error::AnalysisError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of retained frames
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded FIFO of magnitude frames
#[derive(Debug, Clone)]
pub struct SpectrogramHistory {
    frames: VecDeque<Arc<[f32]>>,
    capacity: usize,
}

impl Default for SpectrogramHistory {
    fn default() -> Self {
        Self {
            frames: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl SpectrogramHistory {
    /// Create a history retaining at most `capacity` frames
    pub fn with_capacity(capacity: usize) -> Result<Self, AnalysisError> {
        if capacity == 0 {
            return Err(AnalysisError::InvalidHistoryCapacity);
        }

        Ok(Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a copy of `frame`, evicting the oldest frame when full
    pub fn push(&mut self, frame: &[f32]) {
        while self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(Arc::from(frame));
    }

    /// Retained frames, oldest first
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &[f32]> + DoubleEndedIterator + '_ {
        self.frames.iter().map(|f| &f[..])
    }

    /// Most recently pushed frame
    pub fn latest(&self) -> Option<&[f32]> {
        self.frames.back().map(|f| &f[..])
    }

    /// Shared handles to every retained frame, oldest first
    pub fn snapshot(&self) -> Vec<Arc<[f32]>> {
        self.frames.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Thread-safe spectrogram history
///
/// Cloning yields another handle to the same history. Readers take
/// snapshots, so a frame can never be evicted while it is being read.
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Arc<Mutex<SpectrogramHistory>>,
}

impl SharedHistory {
    pub fn new(history: SpectrogramHistory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(history)),
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, AnalysisError> {
        Ok(Self::new(SpectrogramHistory::with_capacity(capacity)?))
    }

    /// A poisoned lock still holds a consistent history: every mutation is a
    /// single push.
    fn lock(&self) -> MutexGuard<'_, SpectrogramHistory> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, frame: &[f32]) {
        self.lock().push(frame);
    }

    /// Consistent copy of the retained frames, oldest first
    pub fn snapshot(&self) -> Vec<Arc<[f32]>> {
        self.lock().snapshot()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: f32, width: usize) -> Vec<f32> {
        vec![tag; width]
    }

    #[test]
    fn test_insertion_order_below_capacity() {
        let mut history = SpectrogramHistory::with_capacity(5).unwrap();
        for i in 0..3 {
            history.push(&frame(i as f32, 4));
        }

        assert_eq!(history.len(), 3);
        let tags: Vec<f32> = history.frames().map(|f| f[0]).collect();
        assert_eq!(tags, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_fifo_eviction() {
        let capacity = DEFAULT_HISTORY_CAPACITY;
        let mut history = SpectrogramHistory::default();
        for i in 0..=capacity {
            history.push(&frame(i as f32, 8));
        }

        assert_eq!(history.len(), capacity);
        let tags: Vec<f32> = history.frames().map(|f| f[0]).collect();
        let expected: Vec<f32> = (1..=capacity).map(|i| i as f32).collect();
        assert_eq!(tags, expected);
        assert_eq!(history.latest().map(|f| f[0]), Some(capacity as f32));
    }

    #[test]
    fn test_frames_keep_own_width() {
        let mut history = SpectrogramHistory::with_capacity(3).unwrap();
        history.push(&frame(0.0, 512));
        history.push(&frame(1.0, 1024));
        history.push(&frame(2.0, 256));

        let widths: Vec<usize> = history.frames().map(|f| f.len()).collect();
        assert_eq!(widths, vec![512, 1024, 256]);
    }

    #[test]
    fn test_push_copies_input() {
        let mut history = SpectrogramHistory::with_capacity(2).unwrap();
        let mut data = frame(1.0, 4);
        history.push(&data);
        data[0] = 99.0;

        assert_eq!(history.latest().unwrap()[0], 1.0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            SpectrogramHistory::with_capacity(0).err(),
            Some(AnalysisError::InvalidHistoryCapacity)
        );
    }

    #[test]
    fn test_snapshot_survives_eviction() {
        let shared = SharedHistory::with_capacity(2).unwrap();
        shared.push(&frame(0.0, 4));
        shared.push(&frame(1.0, 4));

        let snapshot = shared.snapshot();
        shared.push(&frame(2.0, 4));
        shared.push(&frame(3.0, 4));

        assert_eq!(snapshot[0][0], 0.0);
        assert_eq!(snapshot[1][0], 1.0);
        let tags: Vec<f32> = shared.snapshot().iter().map(|f| f[0]).collect();
        assert_eq!(tags, vec![2.0, 3.0]);
    }

    #[test]
    fn test_shared_across_threads() {
        let shared = SharedHistory::with_capacity(50).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let history = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        history.push(&frame(t as f32, 16));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 50);
        assert!(shared.snapshot().iter().all(|f| f.len() == 16));
    }
}
