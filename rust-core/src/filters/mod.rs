//! Frequency-domain filtering

pub mod mask;

pub use mask::{apply_filter, filter_frame, BinMask, FilterKind, FilterSpec};
