//! Spectrum analyzer and spectral queries
//!
//! The analyzer runs pad → window → transform → normalize → domain toggle
//! on a [`SpectralBuffer`]; the query functions read the result.

use super::buffer::SpectralBuffer;
use super::fft::{Backend, Transform};
use super::windowing::{apply_window_inplace, WindowType};
use crate::util::wrap_index;

/// Sentinel returned by magnitude/phase queries on a buffer with no data
pub const INVALID: f32 = -1.0;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalyzerConfig {
    /// Transform backend
    pub backend: Backend,

    /// Window applied to the real channel before every transform
    pub window_type: WindowType,
}

/// Runs the transform pipeline with a backend fixed at construction
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    transform: Box<dyn Transform>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            transform: config.backend.build(),
            config,
        }
    }

    /// Transform `buffer` in place
    ///
    /// Pads to a power of two, windows the real channel, transforms,
    /// rescales the amplitude, and flips the domain flag. The flag flips on
    /// every call whatever the buffer held; running twice does not invert.
    ///
    /// # Returns
    /// The buffer length after padding
    pub fn run(&self, buffer: &mut SpectralBuffer) -> usize {
        let n = buffer.pad();
        let (real, imag) = buffer.channels_mut();

        apply_window_inplace(real, self.config.window_type);
        self.transform.forward(real, imag);
        self.transform.normalize(real, imag);

        buffer.toggle_domain();

        log::debug!(
            "Ran {} transform over {} bins, now in {:?} domain",
            self.transform.name(),
            n,
            buffer.domain()
        );
        n
    }

    /// Update configuration
    pub fn update_config(&mut self, config: AnalyzerConfig) {
        if config.backend != self.config.backend {
            self.transform = config.backend.build();
        }
        self.config = config;
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Name of the active transform backend
    pub fn backend_name(&self) -> &'static str {
        self.transform.name()
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Strongest bin in a scanned range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub magnitude: f32,
    pub bin: usize,
}

fn bin_magnitude(buffer: &SpectralBuffer, idx: usize) -> f64 {
    let re = buffer.real()[idx] as f64;
    let im = buffer.imag()[idx] as f64;
    (re * re + im * im).sqrt()
}

/// Magnitude of bin `idx`
///
/// The spectrum is periodic with period `len`, so any index, negative or
/// past the end, is wrapped onto `[0, len)`. Returns [`INVALID`] for an
/// empty buffer.
pub fn magnitude(buffer: &SpectralBuffer, idx: i64) -> f32 {
    match wrap_index(idx, buffer.len()) {
        Some(i) => bin_magnitude(buffer, i) as f32,
        None => INVALID,
    }
}

/// Phase of bin `idx` in radians, `atan2(imag, real)`
///
/// Same wrapping and sentinel as [`magnitude`].
pub fn phase(buffer: &SpectralBuffer, idx: i64) -> f32 {
    match wrap_index(idx, buffer.len()) {
        Some(i) => (buffer.imag()[i] as f64).atan2(buffer.real()[i] as f64) as f32,
        None => INVALID,
    }
}

/// Find the bin with the largest magnitude in `[start, end)`
///
/// A `start` outside `[1, len]` becomes 1 and an `end` outside `[1, len]`
/// becomes `len / 2`, so the default scan covers the non-redundant half of a
/// real signal's spectrum without DC. Ties keep the first bin. An empty range
/// yields magnitude 0 at bin 0.
pub fn peak_magnitude(buffer: &SpectralBuffer, start: i64, end: i64) -> Peak {
    let len = buffer.len();
    let len_i = len as i64;

    let start = if start < 1 || start > len_i { 1 } else { start as usize };
    let end = if end < 1 || end > len_i { len / 2 } else { end as usize };

    let mut peak = Peak {
        magnitude: 0.0,
        bin: 0,
    };
    let mut best = 0.0f64;

    for i in start..end {
        let mag = bin_magnitude(buffer, i);
        if mag > best {
            best = mag;
            peak = Peak {
                magnitude: mag as f32,
                bin: i,
            };
        }
    }

    peak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::buffer::Domain;
    use std::f32::consts::PI;

    fn spectrum(real: Vec<f32>, imag: Vec<f32>) -> SpectralBuffer {
        SpectralBuffer::from_parts(real, imag, Domain::Frequency)
    }

    #[test]
    fn test_magnitude_and_phase() {
        let buf = spectrum(vec![3.0, 0.0, -1.0, 0.0], vec![4.0, 2.0, 0.0, -1.0]);

        assert!((magnitude(&buf, 0) - 5.0).abs() < 1e-6);
        assert!((phase(&buf, 1) - PI / 2.0).abs() < 1e-6);
        assert!((phase(&buf, 2) - PI).abs() < 1e-6);
        assert!((phase(&buf, 3) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_index_wraps_periodically() {
        let buf = spectrum(vec![3.0, 0.0, -1.0, 0.0], vec![4.0, 2.0, 0.0, -1.0]);

        assert_eq!(magnitude(&buf, 4), magnitude(&buf, 0));
        assert_eq!(magnitude(&buf, -1), magnitude(&buf, 3));
        assert_eq!(magnitude(&buf, 9), magnitude(&buf, 1));
        assert_eq!(phase(&buf, -6), phase(&buf, 2));
    }

    #[test]
    fn test_empty_buffer_sentinels() {
        let buf = spectrum(vec![], vec![]);
        assert_eq!(magnitude(&buf, 0), INVALID);
        assert_eq!(phase(&buf, 3), INVALID);
        assert_eq!(peak_magnitude(&buf, -1, -1), Peak { magnitude: 0.0, bin: 0 });
    }

    #[test]
    fn test_peak_default_range_skips_dc() {
        let buf = spectrum(vec![100.0, 1.0, 7.0, 2.0, 50.0, 2.0, 7.0, 1.0], vec![0.0; 8]);

        // Default scan is [1, 4)
        let peak = peak_magnitude(&buf, -1, -1);
        assert_eq!(peak, Peak { magnitude: 7.0, bin: 2 });

        // Explicit range reaches bin 4
        let peak = peak_magnitude(&buf, 3, 8);
        assert_eq!(peak.bin, 4);
    }

    #[test]
    fn test_peak_first_tie_wins() {
        let buf = spectrum(vec![0.0, 3.0, 3.0, 3.0], vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(peak_magnitude(&buf, 1, 4).bin, 1);
    }

    #[test]
    fn test_peak_empty_range() {
        let buf = spectrum(vec![0.0, 3.0, 3.0, 3.0], vec![0.0; 4]);
        assert_eq!(peak_magnitude(&buf, 3, 2), Peak { magnitude: 0.0, bin: 0 });
    }

    #[test]
    fn test_run_pads_and_toggles() {
        let analyzer = SpectrumAnalyzer::default();
        let mut buf = SpectralBuffer::from_parts(vec![1.0; 5], vec![], Domain::Time);

        assert_eq!(analyzer.run(&mut buf), 8);
        assert_eq!(buf.domain(), Domain::Frequency);

        analyzer.run(&mut buf);
        assert_eq!(buf.domain(), Domain::Time);
    }

    #[test]
    fn test_rectangular_dc_is_exact() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig {
            backend: Backend::Recursive,
            window_type: WindowType::Rectangular,
        });
        let mut buf = SpectralBuffer::from_parts(vec![1.0; 8], vec![], Domain::Time);
        analyzer.run(&mut buf);

        assert!((magnitude(&buf, 0) - 3.572).abs() < 1e-4);
        for k in 1..8 {
            assert!(magnitude(&buf, k) < 1e-5);
        }
    }

    #[test]
    fn test_update_config_swaps_backend() {
        let mut analyzer = SpectrumAnalyzer::default();
        assert_eq!(analyzer.backend_name(), "recursive-f32");

        analyzer.update_config(AnalyzerConfig {
            backend: Backend::FixedPoint,
            ..AnalyzerConfig::default()
        });
        assert_eq!(analyzer.backend_name(), "iterative-q16");
        assert_eq!(analyzer.config().window_type, WindowType::Hamming);
    }
}
