//! Q16 fixed-point FFT
//!
//! Iterative in-place radix-2 transform: bit-reversal permutation, then
//! log2(n) butterfly stages whose twiddle factor advances by fixed-point
//! complex multiplication instead of a trig call per butterfly.

use super::fft::Transform;
use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

/// Fractional bits of [`Q16`]
pub const FRAC_BITS: u32 = 16;

/// Integer-friendly amplitude-restoration constant of the fixed backend: 7/2
///
/// Bin 0 is scaled by `7 / 2n`, every other bin by `7 / n`. With `n` a power
/// of two this is a multiply by 7 followed by a right shift.
const AMPLITUDE_NUM: i64 = 7;

/// Largest `n * max|x|` the transform handles without saturating
///
/// Q16 values live in an `i64`; a butterfly product of a value with
/// magnitude `n * max|x| * 2^16` and a unit twiddle (`2^16`) must stay below
/// `2^63`.
pub const HEADROOM: f64 = (1u64 << 31) as f64;

/// Signed fixed-point number with 16 fractional bits
///
/// Stored in an `i64` so butterfly sums of full-scale 16-bit audio never
/// clip. Multiplication forms the 64-bit product and shifts it back by 16
/// bits; additions and products saturate at the `i64` limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Q16(i64);

impl Q16 {
    pub const ZERO: Q16 = Q16(0);
    pub const ONE: Q16 = Q16(1 << FRAC_BITS);

    pub const fn from_raw(raw: i64) -> Self {
        Q16(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * (1u64 << FRAC_BITS) as f64).round();
        // `as` saturates out-of-range floats and maps NaN to 0
        Q16(scaled as i64)
    }

    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(value as f64)
    }

    pub fn to_f32(self) -> f32 {
        (self.0 as f64 / (1u64 << FRAC_BITS) as f64) as f32
    }

    /// Multiply by an integer and shift right by `shift` bits
    fn scale(self, mul: i64, shift: u32) -> Self {
        Q16(self.0.saturating_mul(mul) >> shift)
    }
}

impl Add for Q16 {
    type Output = Q16;

    fn add(self, rhs: Q16) -> Q16 {
        Q16(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Q16 {
    type Output = Q16;

    fn sub(self, rhs: Q16) -> Q16 {
        Q16(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Q16 {
    type Output = Q16;

    fn mul(self, rhs: Q16) -> Q16 {
        Q16(self.0.saturating_mul(rhs.0) >> FRAC_BITS)
    }
}

impl Neg for Q16 {
    type Output = Q16;

    fn neg(self) -> Q16 {
        Q16(self.0.saturating_neg())
    }
}

/// Complex product in Q16
#[inline]
fn cmul(a_re: Q16, a_im: Q16, b_re: Q16, b_im: Q16) -> (Q16, Q16) {
    (a_re * b_re - a_im * b_im, a_re * b_im + a_im * b_re)
}

/// Reverse the low `bits` bits of `i`
pub fn reverse_bits(i: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    i.reverse_bits() >> (usize::BITS - bits)
}

/// In-place bit-reversal permutation of a power-of-two length slice
pub fn bit_reverse_permute<T>(data: &mut [T]) {
    let n = data.len();
    if n <= 2 {
        return;
    }
    let bits = n.trailing_zeros();

    for i in 0..n {
        let j = reverse_bits(i, bits);
        // Swap each pair once
        if i < j {
            data.swap(i, j);
        }
    }
}

/// Run the iterative radix-2 DIT transform over Q16 channels
pub fn fft_q16(re: &mut [Q16], im: &mut [Q16]) {
    let n = re.len();
    debug_assert_eq!(n, im.len());
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two());
    let log2n = n.trailing_zeros();

    bit_reverse_permute(re);
    bit_reverse_permute(im);

    for s in 1..=log2n {
        let m = 1usize << s;
        let m2 = m >> 1;

        let theta = -2.0 * PI / m as f64;
        let wm_re = Q16::from_f64(theta.cos());
        let wm_im = Q16::from_f64(theta.sin());

        for k in (0..n).step_by(m) {
            let (mut w_re, mut w_im) = (Q16::ONE, Q16::ZERO);

            for j in 0..m2 {
                let top = k + j;
                let bottom = top + m2;

                let (t_re, t_im) = cmul(w_re, w_im, re[bottom], im[bottom]);
                let (u_re, u_im) = (re[top], im[top]);

                re[top] = u_re + t_re;
                im[top] = u_im + t_im;
                re[bottom] = u_re - t_re;
                im[bottom] = u_im - t_im;

                (w_re, w_im) = cmul(w_re, w_im, wm_re, wm_im);
            }
        }
    }
}

/// Iterative fixed-point transform backend
///
/// Converts the float channels to Q16 on the way in and back on the way
/// out; everything in between is integer arithmetic. Any 16-bit input up to
/// 65536 points fits inside [`HEADROOM`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPointFft;

fn to_q16(values: &[f32]) -> Vec<Q16> {
    values.iter().map(|&v| Q16::from_f32(v)).collect()
}

fn write_back(dst: &mut [f32], src: &[Q16]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = s.to_f32();
    }
}

impl Transform for FixedPointFft {
    fn name(&self) -> &'static str {
        "iterative-q16"
    }

    fn forward(&self, real: &mut [f32], imag: &mut [f32]) {
        let peak = real
            .iter()
            .chain(imag.iter())
            .fold(0.0f64, |acc, &v| acc.max((v as f64).abs()));
        if peak * real.len() as f64 >= HEADROOM {
            log::warn!(
                "Q16 transform may saturate: {} points with peak {} exceed headroom",
                real.len(),
                peak
            );
        }

        let mut re = to_q16(real);
        let mut im = to_q16(imag);

        fft_q16(&mut re, &mut im);

        write_back(real, &re);
        write_back(imag, &im);
    }

    fn normalize(&self, real: &mut [f32], imag: &mut [f32]) {
        let n = real.len();
        if n == 0 {
            return;
        }
        let log2n = n.trailing_zeros();

        let mut re = to_q16(real);
        let mut im = to_q16(imag);

        re[0] = re[0].scale(AMPLITUDE_NUM, log2n + 1);
        im[0] = im[0].scale(AMPLITUDE_NUM, log2n + 1);
        for (r, i) in re[1..].iter_mut().zip(im[1..].iter_mut()) {
            *r = r.scale(AMPLITUDE_NUM, log2n);
            *i = i.scale(AMPLITUDE_NUM, log2n);
        }

        write_back(real, &re);
        write_back(imag, &im);
    }
}
