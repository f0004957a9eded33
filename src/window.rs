//! Smoothing-window coefficient tables.
//!
//! Formulas follow the MATLAB conventions for each window type. All tables
//! are symmetric about their center with coefficients in [0, 1].

use std::f64::consts::PI;

use crate::config::WindowFunction;
use crate::utils::Float;

/// Generate the `n` coefficients of `function`.
///
/// Callers guarantee `n >= 2`; the cosine windows divide by `n - 1`.
pub fn coefficients(n: usize, function: WindowFunction) -> Vec<Float> {
    match function {
        WindowFunction::Rectangular => vec![1.0; n],
        WindowFunction::Triangular => triangular(n),
        WindowFunction::Bartlett => bartlett(n),
        WindowFunction::Hann => hann(n),
        WindowFunction::Hamming => hamming(n),
        WindowFunction::Blackman => blackman(n),
    }
}

fn triangular(n: usize) -> Vec<Float> {
    let nf = n as Float;
    let mut w = vec![0.0; n];
    // ascent/descent formulas differ by parity
    if n % 2 == 1 {
        for (i, x) in w.iter_mut().enumerate() {
            let up = 2.0 * (i + 1) as Float / (nf + 1.0);
            *x = if i < (n + 1) / 2 { up } else { 2.0 - up };
        }
    } else {
        for (i, x) in w.iter_mut().enumerate() {
            let up = (2.0 * (i + 1) as Float - 1.0) / nf;
            *x = if i < n / 2 { up } else { 2.0 - up };
        }
    }
    w
}

fn bartlett(n: usize) -> Vec<Float> {
    let last = (n - 1) as Float;
    let mid = (n - 1) / 2;
    (0..n)
        .map(|i| {
            let up = 2.0 * i as Float / last;
            if i <= mid {
                up
            } else {
                2.0 - up
            }
        })
        .collect()
}

fn hann(n: usize) -> Vec<Float> {
    let last = (n - 1) as Float;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as Float / last).cos()))
        .collect()
}

fn hamming(n: usize) -> Vec<Float> {
    let last = (n - 1) as Float;
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as Float / last).cos())
        .collect()
}

fn blackman(n: usize) -> Vec<Float> {
    let last = (n - 1) as Float;
    (0..n)
        .map(|i| {
            let x = i as Float / last;
            0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_symmetric(w: &[Float]) {
        for (a, b) in w.iter().zip(w.iter().rev()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn rectangular_is_all_ones() {
        let w = coefficients(16, WindowFunction::Rectangular);
        assert_eq!(w, vec![1.0; 16]);
    }

    #[test]
    fn triangular_odd_length() {
        let w = coefficients(7, WindowFunction::Triangular);
        let expected = [0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25];
        for (a, e) in w.iter().zip(&expected) {
            assert_relative_eq!(a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn triangular_even_length() {
        let w = coefficients(8, WindowFunction::Triangular);
        let expected = [0.125, 0.375, 0.625, 0.875, 0.875, 0.625, 0.375, 0.125];
        for (a, e) in w.iter().zip(&expected) {
            assert_relative_eq!(a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn bartlett_has_zero_endpoints() {
        let w = coefficients(8, WindowFunction::Bartlett);
        assert_relative_eq!(w[0], 0.0);
        assert_relative_eq!(w[7], 0.0);
        assert_relative_eq!(w[3], 6.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(w[4], 6.0 / 7.0, epsilon = 1e-12);
        assert_symmetric(&w);
    }

    #[test]
    fn hann_of_eight() {
        let w = coefficients(8, WindowFunction::Hann);
        let expected = [
            0.0, 0.1882550990706332, 0.6112604669781572, 0.9504844339512095,
            0.9504844339512095, 0.6112604669781572, 0.1882550990706332, 0.0,
        ];
        for (a, e) in w.iter().zip(&expected) {
            assert_relative_eq!(a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn hamming_keeps_nonzero_endpoints() {
        let w = coefficients(8, WindowFunction::Hamming);
        assert_relative_eq!(w[0], 0.08, epsilon = 1e-12);
        assert_relative_eq!(w[7], 0.08, epsilon = 1e-12);
        assert_symmetric(&w);
    }

    #[test]
    fn blackman_endpoints_vanish() {
        let w = coefficients(8, WindowFunction::Blackman);
        assert_relative_eq!(w[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(w[7], 0.0, epsilon = 1e-12);
        assert_symmetric(&w);
    }

    #[test]
    fn coefficients_stay_in_unit_range() {
        for function in [
            WindowFunction::Triangular,
            WindowFunction::Bartlett,
            WindowFunction::Hann,
            WindowFunction::Hamming,
            WindowFunction::Blackman,
        ] {
            for n in [2, 7, 8, 64, 255, 256] {
                let w = coefficients(n, function);
                assert_eq!(w.len(), n);
                assert!(
                    w.iter().all(|&x| (-1e-12..=1.0 + 1e-12).contains(&x)),
                    "{function} of length {n} escaped [0, 1]"
                );
                assert_symmetric(&w);
            }
        }
    }
}
