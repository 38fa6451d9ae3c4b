//! Pocket Spectrum - Compact Audio Spectral Analysis Core
//! 
//! Power-of-two FFT over 16-bit sample buffers with two interchangeable
//! backends (recursive float and iterative Q16 fixed point), plus spectral
//! queries and time-domain signal statistics.

pub mod audio;
pub mod session;
pub mod spectrum;
pub mod util;

pub use audio::{FormatTag, SampleBuffer};
pub use session::{SampleHandle, SpectralSession, SpectrumHandle};
pub use spectrum::{AnalyzerConfig, Backend, SpectralBuffer, SpectrumAnalyzer};
