//! Time-domain signal statistics
//!
//! Works on the sample buffer directly, independent of any transform.

use super::samples::SampleBuffer;
use crate::util::clamp_range;

/// Mean sample value over `[start, end)` (clamped)
///
/// Returns `0.0` for an empty range.
pub fn signal_mean(buffer: &SampleBuffer, start: i64, end: i64) -> f32 {
    let range = clamp_range(start, end, buffer.len());
    let window = &buffer.samples()[range];
    if window.is_empty() {
        return 0.0;
    }

    let sum: f64 = window.iter().map(|&s| s as f64).sum();
    (sum / window.len() as f64) as f32
}

/// Signal "energy" over `[start, end)` (clamped)
///
/// This is the mean of squared deviations from the range mean, i.e. the
/// variance of the samples, not the raw sum of squares.
/// Returns `0.0` for an empty range.
pub fn signal_energy(buffer: &SampleBuffer, start: i64, end: i64) -> f32 {
    let range = clamp_range(start, end, buffer.len());
    let window = &buffer.samples()[range];
    if window.is_empty() {
        return 0.0;
    }

    let n = window.len() as f64;
    let mean: f64 = window.iter().map(|&s| s as f64).sum::<f64>() / n;
    let energy: f64 = window
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    energy as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FormatTag;

    fn buffer(samples: &[i16]) -> SampleBuffer {
        SampleBuffer::new(samples.to_vec(), 8000, FormatTag::default()).unwrap()
    }

    #[test]
    fn test_constant_signal_has_zero_energy() {
        let buf = buffer(&[-250; 64]);
        assert_eq!(signal_energy(&buf, 0, 64), 0.0);
        assert_eq!(signal_energy(&buf, -1, -1), 0.0);
    }

    #[test]
    fn test_energy_is_variance() {
        // mean 0, deviations ±2 -> variance 4 (sum of squares would be 16)
        let buf = buffer(&[2, -2, 2, -2]);
        assert!((signal_energy(&buf, 0, 4) - 4.0).abs() < 1e-6);

        // Offset does not change variance
        let buf = buffer(&[102, 98, 102, 98]);
        assert!((signal_energy(&buf, 0, 4) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_energy_sub_range() {
        let buf = buffer(&[0, 0, 1, 3, 0, 0]);
        // [1, 3]: mean 2, variance 1
        assert!((signal_energy(&buf, 2, 4) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_range() {
        let buf = buffer(&[1, 2, 3]);
        assert_eq!(signal_energy(&buf, 2, 1), 0.0);
        assert_eq!(signal_mean(&buf, 2, 2), 0.0);
    }

    #[test]
    fn test_mean() {
        let buf = buffer(&[1, 2, 3, 6]);
        assert!((signal_mean(&buf, 0, 4) - 3.0).abs() < 1e-6);
    }
}
