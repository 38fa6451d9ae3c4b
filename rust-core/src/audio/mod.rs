//! Time-domain sample buffers and signal statistics

pub mod samples;
pub mod stats;

pub use samples::{FormatTag, SampleBuffer, SampleError};
pub use stats::{signal_energy, signal_mean};
