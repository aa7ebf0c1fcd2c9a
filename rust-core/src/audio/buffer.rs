//! Sample hand-off between a capture adapter and the live analysis thread

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Create a lock-free channel holding up to `capacity` samples
pub(crate) fn sample_channel(capacity: usize) -> (SampleProducer, SampleConsumer) {
    let (producer, consumer) = HeapRb::<f32>::new(capacity).split();
    (SampleProducer(producer), SampleConsumer(consumer))
}

/// Writing end, handed to the capture adapter
pub struct SampleProducer(HeapProducer<f32>);

impl SampleProducer {
    /// Push captured samples
    ///
    /// # Returns
    /// Number of samples accepted; the rest are dropped when the analysis
    /// thread falls behind
    pub fn write(&mut self, samples: &[f32]) -> usize {
        self.0.push_slice(samples)
    }
}

/// Reading end, owned by the analysis thread
pub(crate) struct SampleConsumer(HeapConsumer<f32>);

impl SampleConsumer {
    /// Fill as much of `frame` as is buffered, returning the count
    pub(crate) fn read(&mut self, frame: &mut [f32]) -> usize {
        self.0.pop_slice(frame)
    }
}
