//! Spectral analysis with FFT

pub mod analysis;
pub mod buffer;
pub mod fft;
pub mod fixed;
pub mod windowing;

pub use analysis::{magnitude, peak_magnitude, phase, AnalyzerConfig, Peak, SpectrumAnalyzer};
pub use buffer::{Domain, SpectralBuffer, SpectrumError};
pub use fft::{Backend, RecursiveFft, Transform};
pub use fixed::{FixedPointFft, Q16};
pub use windowing::{apply_hamming_window, apply_window_inplace, WindowType};
