//!
//! Shared type aliases and small helper functions,
//! mostly related to window geometry.
//!
use num_complex::Complex;

pub type Int = i32; // sample type wav samples are decoded into
pub type Float = f64; // precision used for all spectral math
pub type CFloat = Complex<Float>;

/// Power-of-two check, rejecting 0 and 1.
///
/// Window lengths below 2 would put a zero in the N-1 denominators of the
/// cosine window formulas, so the validator treats 1 as "not a power of two".
pub fn is_pow2(n: usize) -> bool {
    n > 1 && (n & (n - 1)) == 0
}

/// Smallest power of two strictly greater than `n`.
pub fn next_pow2(n: usize) -> usize {
    let mut p = 2;
    while p <= n {
        p <<= 1;
    }
    p
}

/// Duration of `n` samples (per channel) at `fs` hz, in milliseconds.
pub fn samples_to_ms(n: usize, fs: Float) -> Float {
    n as Float * 1000.0 / fs
}
