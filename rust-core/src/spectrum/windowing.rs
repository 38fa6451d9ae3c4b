//! Windowing functions for spectral analysis
//!
//! Applied to the real channel before every transform to reduce spectral leakage

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    #[default]
    Hamming,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Rectangular window (no windowing)
    Rectangular,
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1.
/// For M <= 1 the symmetric formulas divide by zero, so every window
/// degenerates to all-ones there.
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0; length];
    }

    let m = length as f64;
    let (a0, a1) = match window_type {
        WindowType::Hamming => (0.54, 0.46),
        WindowType::Hann => (0.5, 0.5),
        WindowType::Rectangular => return vec![1.0; length],
    };

    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            (a0 - a1 * angle.cos()) as f32
        })
        .collect()
}

/// Apply window in-place
pub fn apply_window_inplace(signal: &mut [f32], window_type: WindowType) {
    if window_type == WindowType::Rectangular {
        return;
    }

    let window = generate_window(window_type, signal.len());
    for (s, w) in signal.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Apply a Hamming window to the first `n` elements of `real`
pub fn apply_hamming_window(real: &mut [f32], n: usize) {
    let n = n.min(real.len());
    apply_window_inplace(&mut real[..n], WindowType::Hamming);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_coefficients() {
        let window = generate_window(WindowType::Hamming, 161);

        assert_eq!(window.len(), 161);
        // Symmetric, 0.08 at the edges and 1.0 in the centre
        assert!((window[0] - window[160]).abs() < 1e-6);
        assert!((window[0] - 0.08).abs() < 1e-6);
        assert!((window[80] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_apply_hamming_window() {
        let mut signal = vec![1.0; 100];
        apply_hamming_window(&mut signal, 100);

        assert!(signal[0] < 0.1);
        assert!(signal[99] < 0.1);
        assert!(signal[50] > 0.99);
    }

    #[test]
    fn test_apply_hamming_window_prefix_only() {
        let mut signal = vec![2.0; 8];
        apply_hamming_window(&mut signal, 4);

        assert!((signal[0] - 0.16).abs() < 1e-6);
        assert_eq!(&signal[4..], &[2.0; 4]);
    }

    #[test]
    fn test_degenerate_lengths() {
        let mut single = vec![5.0];
        apply_hamming_window(&mut single, 1);
        assert_eq!(single, vec![5.0]);

        let mut empty: Vec<f32> = Vec::new();
        apply_hamming_window(&mut empty, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert!(window.iter().all(|&w| w == 1.0));

        let mut signal = vec![3.0; 10];
        apply_window_inplace(&mut signal, WindowType::Rectangular);
        assert_eq!(signal, vec![3.0; 10]);
    }

    #[test]
    fn test_hann_edges_are_zero() {
        let window = generate_window(WindowType::Hann, 64);
        assert!(window[0].abs() < 1e-6);
        assert!(window[63].abs() < 1e-6);
    }
}
