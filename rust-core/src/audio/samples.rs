//! Time-domain sample storage
//!
//! Owns a run of signed 16-bit PCM samples handed over by the capture side,
//! plus the sampling-rate metadata needed to synthesize test tones.

use crate::util::clamp_range;
use std::f32::consts::PI;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("No sample data supplied")]
    NoData,

    #[error("PCM byte stream has odd length {0}; expected 16-bit samples")]
    OddByteCount(usize),
}

/// Host audio format tag
///
/// Carried alongside the samples and never interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatTag(pub u32);

/// Contiguous run of time-domain samples
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    format: FormatTag,
}

impl SampleBuffer {
    /// Create a sample buffer from already-decoded samples
    ///
    /// # Arguments
    /// * `samples` - 16-bit PCM samples (must not be empty)
    /// * `sample_rate` - Sampling frequency in Hz; `0` is stored as given but
    ///   leaves the buffer unable to synthesize tones
    /// * `format` - Opaque host format tag
    pub fn new(samples: Vec<i16>, sample_rate: u32, format: FormatTag) -> Result<Self, SampleError> {
        if samples.is_empty() {
            return Err(SampleError::NoData);
        }
        Ok(Self {
            samples,
            sample_rate,
            format,
        })
    }

    /// Create a sample buffer from raw little-endian 16-bit PCM bytes
    ///
    /// The capture side reports its data as bytes; the sample count is half
    /// the byte count.
    pub fn from_pcm_bytes(bytes: &[u8], sample_rate: u32, format: FormatTag) -> Result<Self, SampleError> {
        if bytes.len() % 2 != 0 {
            return Err(SampleError::OddByteCount(bytes.len()));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Self::new(samples, sample_rate, format)
    }

    /// Get sample at `idx`, or `0` when `idx` is outside the buffer
    pub fn sample(&self, idx: i64) -> i16 {
        if idx < 0 {
            return 0;
        }
        self.samples.get(idx as usize).copied().unwrap_or(0)
    }

    /// Write a synthetic signal into `[start, end)` (clamped)
    ///
    /// # Arguments
    /// * `freq_hz` - Tone frequency; `<= 0` writes a constant level instead
    /// * `amplitude` - Peak amplitude (or the constant level)
    /// * `start` - First sample index
    /// * `end` - One past the last sample index
    ///
    /// A constant overwrites the range. A tone is mixed into the existing
    /// samples, saturating at the `i16` limits. Without a sample rate a tone
    /// has no defined phase step and the call leaves the samples unchanged.
    pub fn synthesize(&mut self, freq_hz: f32, amplitude: i32, start: i64, end: i64) {
        let range = clamp_range(start, end, self.samples.len());
        let level = amplitude.clamp(i16::MIN as i32, i16::MAX as i32) as i16;

        if freq_hz <= 0.0 {
            self.samples[range].fill(level);
            return;
        }

        if self.sample_rate == 0 {
            log::warn!("Tone synthesis skipped: buffer has no sample rate");
            return;
        }

        let rate = self.sample_rate as f32;
        for i in range {
            let phase = 2.0 * PI * freq_hz * (i as f32 / rate);
            let tone = (amplitude as f32 * phase.cos()) as i16;
            self.samples[i] = self.samples[i].saturating_add(tone);
        }
    }

    /// All samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed buffer
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling frequency in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Host format tag
    pub fn format(&self) -> FormatTag {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        let err = SampleBuffer::new(Vec::new(), 44100, FormatTag::default()).unwrap_err();
        assert_eq!(err, SampleError::NoData);
    }

    #[test]
    fn test_from_pcm_bytes_halves_length() {
        let bytes = [0x01, 0x00, 0xff, 0xff, 0x00, 0x80, 0xff, 0x7f];
        let buf = SampleBuffer::from_pcm_bytes(&bytes, 8000, FormatTag(2)).unwrap();

        assert_eq!(buf.len(), 4);
        assert_eq!(buf.samples(), &[1, -1, i16::MIN, i16::MAX]);
        assert_eq!(buf.format(), FormatTag(2));
    }

    #[test]
    fn test_from_pcm_bytes_odd_length() {
        let err = SampleBuffer::from_pcm_bytes(&[0, 1, 2], 8000, FormatTag(2)).unwrap_err();
        assert_eq!(err, SampleError::OddByteCount(3));
    }

    #[test]
    fn test_sample_out_of_range_is_zero() {
        let buf = SampleBuffer::new(vec![5, 6, 7], 8000, FormatTag::default()).unwrap();

        assert_eq!(buf.sample(1), 6);
        assert_eq!(buf.sample(3), 0);
        assert_eq!(buf.sample(-1), 0);
    }

    #[test]
    fn test_synthesize_constant_overwrites() {
        let mut buf = SampleBuffer::new(vec![9; 8], 8000, FormatTag::default()).unwrap();
        buf.synthesize(0.0, 3, 2, 5);

        assert_eq!(buf.samples(), &[9, 9, 3, 3, 3, 9, 9, 9]);
    }

    #[test]
    fn test_synthesize_tone_mixes() {
        let mut buf = SampleBuffer::new(vec![10; 8], 8, FormatTag::default()).unwrap();
        // One cycle over 8 samples at 8 Hz sample rate
        buf.synthesize(1.0, 100, -1, -1);

        assert_eq!(buf.sample(0), 110);
        assert_eq!(buf.sample(2), 10);
        assert_eq!(buf.sample(4), -90);
    }

    #[test]
    fn test_synthesize_saturates() {
        let mut buf = SampleBuffer::new(vec![i16::MAX; 2], 8, FormatTag::default()).unwrap();
        buf.synthesize(1.0, 1000, 0, 1);

        assert_eq!(buf.sample(0), i16::MAX);
    }

    #[test]
    fn test_zero_sample_rate_accepted() {
        let mut buf = SampleBuffer::new(vec![4, 5, 6, 7], 0, FormatTag::default()).unwrap();
        assert_eq!(buf.sample_rate(), 0);

        buf.synthesize(440.0, 1000, -1, -1);
        assert_eq!(buf.samples(), &[4, 5, 6, 7]);

        buf.synthesize(0.0, 2, 1, 3);
        assert_eq!(buf.samples(), &[4, 2, 2, 7]);
    }
}
