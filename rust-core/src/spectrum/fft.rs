//! Fourier transform backends
//!
//! Two interchangeable kernels behind one [`Transform`] trait: a recursive
//! radix-2 float transform and an iterative Q16 fixed-point transform
//! (see [`super::fixed`]). Both expect a power-of-two length and produce the
//! unnormalized DFT in natural order.

use super::fixed::FixedPointFft;
use num_complex::Complex32;
use std::f64::consts::PI;

/// Amplitude-restoration constant of the float backend
///
/// Bin 0 is divided by `n / 3.572`, every other bin multiplied by
/// `2 / (n / 3.572)`.
pub const FLOAT_AMPLITUDE_RESTORE: f32 = 3.572;

/// A forward Fourier transform over split real/imaginary channels
pub trait Transform: Send {
    /// Short backend name, used in logs
    fn name(&self) -> &'static str;

    /// Overwrite `(real, imag)` with their DFT, unnormalized, natural order
    ///
    /// Both slices must have the same power-of-two length.
    fn forward(&self, real: &mut [f32], imag: &mut [f32]);

    /// Rescale transform output to single-sided amplitude
    fn normalize(&self, real: &mut [f32], imag: &mut [f32]);
}

/// Transform backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Recursive radix-2 decimation-in-time, single-precision float
    #[default]
    Recursive,

    /// Iterative radix-2 with bit reversal, Q16 fixed point
    FixedPoint,
}

impl Backend {
    /// Instantiate the selected transform
    pub fn build(self) -> Box<dyn Transform> {
        match self {
            Backend::Recursive => Box::new(RecursiveFft),
            Backend::FixedPoint => Box::new(FixedPointFft),
        }
    }
}

/// Recursive radix-2 Cooley–Tukey transform in `f32`
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveFft;

impl RecursiveFft {
    fn transform(data: &mut [Complex32]) {
        let n = data.len();
        if n <= 1 {
            return;
        }
        let half = n / 2;

        let mut even: Vec<Complex32> = data.iter().step_by(2).copied().collect();
        let mut odd: Vec<Complex32> = data.iter().skip(1).step_by(2).copied().collect();

        Self::transform(&mut even);
        Self::transform(&mut odd);

        for k in 0..half {
            // Twiddle e^{-2πik/n}, recomputed per butterfly
            let angle = -2.0 * PI * k as f64 / n as f64;
            let w = Complex32::new(angle.cos() as f32, angle.sin() as f32);
            let t = w * odd[k];

            data[k] = even[k] + t;
            data[k + half] = even[k] - t;
        }
    }
}

impl Transform for RecursiveFft {
    fn name(&self) -> &'static str {
        "recursive-f32"
    }

    fn forward(&self, real: &mut [f32], imag: &mut [f32]) {
        debug_assert_eq!(real.len(), imag.len());
        debug_assert!(real.len() <= 1 || real.len().is_power_of_two());

        let mut data: Vec<Complex32> = real
            .iter()
            .zip(imag.iter())
            .map(|(&re, &im)| Complex32::new(re, im))
            .collect();

        Self::transform(&mut data);

        for ((re, im), c) in real.iter_mut().zip(imag.iter_mut()).zip(data) {
            *re = c.re;
            *im = c.im;
        }
    }

    fn normalize(&self, real: &mut [f32], imag: &mut [f32]) {
        let n = real.len();
        if n == 0 {
            return;
        }

        let scale = n as f32 / FLOAT_AMPLITUDE_RESTORE;
        real[0] /= scale;
        imag[0] /= scale;

        let ac_gain = 2.0 / scale;
        for (re, im) in real[1..].iter_mut().zip(imag[1..].iter_mut()) {
            *re *= ac_gain;
            *im *= ac_gain;
        }
    }
}

/// Direct O(n²) DFT, used as ground truth in tests
#[cfg(test)]
pub(crate) fn naive_dft(real: &[f32], imag: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let n = real.len();
    let mut out_re = vec![0.0f32; n];
    let mut out_im = vec![0.0f32; n];

    for k in 0..n {
        let (mut acc_re, mut acc_im) = (0.0f64, 0.0f64);
        for t in 0..n {
            let angle = -2.0 * PI * (k * t) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            acc_re += real[t] as f64 * c - imag[t] as f64 * s;
            acc_im += real[t] as f64 * s + imag[t] as f64 * c;
        }
        out_re[k] = acc_re as f32;
        out_im[k] = acc_im as f32;
    }

    (out_re, out_im)
}
