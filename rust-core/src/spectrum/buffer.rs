//! FFT working set
//!
//! Paired real/imaginary channels copied out of a sample range, plus the
//! time/frequency domain flag.

use crate::audio::SampleBuffer;
use crate::util::clamp_range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpectrumError {
    #[error("Source sample buffer holds no data")]
    EmptySource,
}

/// Which view the buffer currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Time,
    Frequency,
}

impl Domain {
    /// The other domain
    pub fn toggled(self) -> Self {
        match self {
            Domain::Time => Domain::Frequency,
            Domain::Frequency => Domain::Time,
        }
    }

    /// Numeric flag: `0` for time, `1` for frequency
    pub fn flag(self) -> i32 {
        match self {
            Domain::Time => 0,
            Domain::Frequency => 1,
        }
    }
}

/// One FFT working set
///
/// `real` and `imag` always have the same length.
#[derive(Debug, Clone)]
pub struct SpectralBuffer {
    real: Vec<f32>,
    imag: Vec<f32>,
    domain: Domain,
}

impl SpectralBuffer {
    /// Copy `[start, end)` (clamped) of a sample buffer into a new working set
    ///
    /// The real channel receives the samples, the imaginary channel is zeroed
    /// and the buffer starts in the time domain.
    pub fn from_samples(source: &SampleBuffer, start: i64, end: i64) -> Result<Self, SpectrumError> {
        if source.is_empty() {
            return Err(SpectrumError::EmptySource);
        }

        let range = clamp_range(start, end, source.len());
        let real: Vec<f32> = source.samples()[range].iter().map(|&s| s as f32).collect();
        let imag = vec![0.0; real.len()];

        Ok(Self {
            real,
            imag,
            domain: Domain::Time,
        })
    }

    /// Build a working set directly from channel data
    ///
    /// The shorter channel is zero-extended to match the longer one.
    pub fn from_parts(mut real: Vec<f32>, mut imag: Vec<f32>, domain: Domain) -> Self {
        let len = real.len().max(imag.len());
        real.resize(len, 0.0);
        imag.resize(len, 0.0);

        Self { real, imag, domain }
    }

    /// Zero-pad both channels up to the next power of two
    ///
    /// # Returns
    /// The new length. A length that is already a power of two is left alone;
    /// an empty buffer grows to length 1.
    pub fn pad(&mut self) -> usize {
        let n = self.real.len();
        let padded = n.next_power_of_two();
        if padded == n {
            return n;
        }

        log::debug!("Padding spectral buffer {} -> {}", n, padded);
        self.real.resize(padded, 0.0);
        self.imag.resize(padded, 0.0);
        padded
    }

    /// Current element count
    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Flip the domain flag unconditionally
    pub(crate) fn toggle_domain(&mut self) {
        self.domain = self.domain.toggled();
    }

    pub fn real(&self) -> &[f32] {
        &self.real
    }

    pub fn imag(&self) -> &[f32] {
        &self.imag
    }

    /// Mutable access to both channels at once
    pub fn channels_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.real, &mut self.imag)
    }
}
