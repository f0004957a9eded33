//! In-place radix-2 FFT.

use std::f64::consts::PI;

use crate::utils::{CFloat, Float};

/// Transform `buf` in place into its discrete Fourier transform.
///
/// Iterative Cooley-Tukey, decimation in time: a bit-reversal permutation
/// followed by butterfly passes over stage lengths 2, 4, ..., n. Twiddle
/// factors are evaluated in double precision per stage. The length must be
/// a power of two (validated upstream); buffers shorter than two elements
/// are already their own transform and are left untouched.
pub fn fft_in_place(buf: &mut [CFloat]) {
    let n = buf.len();
    if n < 2 {
        return;
    }
    debug_assert!(n & (n - 1) == 0, "fft length must be a power of two");

    // bit-reversal permutation
    let shift = usize::BITS - n.trailing_zeros();
    for k in 0..n {
        let j = k.reverse_bits() >> shift;
        if j > k {
            buf.swap(j, k);
        }
    }

    // butterfly passes
    let mut len = 2;
    while len <= n {
        for k in 0..len / 2 {
            let kth = -2.0 * PI * k as Float / len as Float;
            let w = CFloat::new(kth.cos(), kth.sin());
            for block in (0..n).step_by(len) {
                let t = w * buf[block + k + len / 2];
                buf[block + k + len / 2] = buf[block + k] - t;
                buf[block + k] += t;
            }
        }
        len *= 2;
    }
}
