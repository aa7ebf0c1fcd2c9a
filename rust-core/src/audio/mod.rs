//! Live sample intake: ring buffer and background analysis thread

pub mod buffer;
pub mod processor;

pub use buffer::SampleProducer;
pub use processor::LiveAnalyzer;
