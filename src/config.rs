use std::fmt;

use crate::utils::{is_pow2, next_pow2, Float};
use crate::Error;

/// Smoothing function applied to each sample window before its FFT.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WindowFunction {
    /// Take blocks of the waveform as-is.
    Rectangular,
    Triangular,
    /// Triangular window with a zero at each end.
    Bartlett,
    Hann,
    Hamming,
    Blackman,
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            WindowFunction::Rectangular => "Rectangular",
            WindowFunction::Triangular => "Triangular",
            WindowFunction::Bartlett => "Bartlett",
            WindowFunction::Hann => "Hann",
            WindowFunction::Hamming => "Hamming",
            WindowFunction::Blackman => "Blackman",
        })
    }
}

/// How frequency-bin amplitudes are scaled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AmplitudeScale {
    /// Raw single-sided amplitudes (2|X|/N); can be arbitrarily large.
    Linear,
    /// Every amplitude divided by the largest amplitude in the whole result,
    /// so all values land in [0, 1]. Needs every frame up front, which is
    /// why frame streams reject it.
    Normalized,
    /// Decibels relative to the full-scale amplitude of the source bit
    /// depth, floored at -100 dB.
    Decibel,
}

/// Parameters of a transform: window geometry, smoothing and amplitude
/// scaling. Construct once per transform; validated before any computation.
#[derive(Clone, Debug)]
pub struct TransformConfig {
    /// Number of samples taken from the waveform per window. Must be a power
    /// of two unless `num_points` is set.
    pub window_size: usize,
    pub window_function: WindowFunction,
    /// Fraction of each window reused as the start of the next, in [0, 1).
    pub overlap: Float,
    /// Total FFT length. When set, the window is padded with
    /// `num_points - window_size` zeroes; must be a power of two no smaller
    /// than `window_size`.
    pub num_points: Option<usize>,
    pub amplitude: AmplitudeScale,
    /// Compatibility heuristic for 8-bit sources: overwrite the DC bin's
    /// amplitude with bin 1's. Old 8-bit captures tend to carry a spurious
    /// spike at DC; this reproduces the historical workaround and is never
    /// applied to other bit depths.
    pub bin0_correction: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            window_size: 4096,
            window_function: WindowFunction::Hann,
            overlap: 0.5,
            num_points: None,
            amplitude: AmplitudeScale::Decibel,
            bin0_correction: true,
        }
    }
}

impl TransformConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_window_function(mut self, function: WindowFunction) -> Self {
        self.window_function = function;
        self
    }

    pub fn with_overlap(mut self, overlap: Float) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.num_points = Some(num_points);
        self
    }

    pub fn with_amplitude(mut self, amplitude: AmplitudeScale) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_bin0_correction(mut self, enabled: bool) -> Self {
        self.bin0_correction = enabled;
        self
    }

    /// Number of zeroes appended to each window before the FFT.
    pub fn zero_pad_len(&self) -> usize {
        self.num_points.map_or(0, |n| n - self.window_size)
    }

    /// Total window length including zero padding; this is the FFT size.
    pub fn total_window_len(&self) -> usize {
        self.num_points.unwrap_or(self.window_size)
    }

    /// Checks every parameter before a transform starts. `for_stream` adds
    /// the constraints that only apply to lazy frame-by-frame computation.
    pub fn validate(&self, for_stream: bool) -> Result<(), Error> {
        if self.window_size == 0 {
            return Err(Error::Config(format!(
                "window size must be positive; was set to {}",
                self.window_size
            )));
        }

        if self.num_points.is_none() && !is_pow2(self.window_size) {
            return Err(Error::Config(format!(
                "if num_points is not set, window size must be a power of two; was set to {}. \
                 to keep a window of {} samples, set num_points to {} and the signal will be \
                 zero-padded up to that length",
                self.window_size,
                self.window_size,
                next_pow2(self.window_size)
            )));
        }

        if !(0.0..1.0).contains(&self.overlap) {
            return Err(Error::Config(format!(
                "window overlap must be at least 0 and less than 1; was set to {}",
                self.overlap
            )));
        }

        if let Some(num_points) = self.num_points {
            if num_points < self.window_size {
                return Err(Error::Config(format!(
                    "num_points must be at least as large as window size; window size was {} \
                     but num_points was only {}",
                    self.window_size, num_points
                )));
            }
            if !is_pow2(num_points) {
                return Err(Error::Config(format!(
                    "num_points must be a power of two; was set to {}",
                    num_points
                )));
            }
        }

        if for_stream && self.amplitude == AmplitudeScale::Normalized {
            return Err(Error::Config(
                "normalization divides by the maximum amplitude across the entire file, \
                 and a frame stream only ever sees one window at a time; use the decibel \
                 or linear scale instead"
                    .into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rejected(config: TransformConfig, for_stream: bool) {
        match config.validate(for_stream) {
            Err(Error::Config(_)) => {}
            other => panic!("expected a config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = TransformConfig::default();
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn rejects_zero_window_size() {
        assert_rejected(TransformConfig::default().with_window_size(0), false);
    }

    #[test]
    fn rejects_non_pow2_window_without_num_points() {
        assert_rejected(TransformConfig::default().with_window_size(4095), false);
        assert_rejected(TransformConfig::default().with_window_size(1), false);
    }

    #[test]
    fn non_pow2_window_is_fine_with_num_points() {
        let config = TransformConfig::default()
            .with_window_size(4095)
            .with_num_points(4096);
        assert!(config.validate(false).is_ok());
        assert_eq!(config.zero_pad_len(), 1);
        assert_eq!(config.total_window_len(), 4096);
    }

    #[test]
    fn rejects_bad_overlap() {
        assert_rejected(TransformConfig::default().with_overlap(-0.1), false);
        assert_rejected(TransformConfig::default().with_overlap(1.0), false);
        assert_rejected(TransformConfig::default().with_overlap(Float::NAN), false);
        assert!(TransformConfig::default()
            .with_overlap(0.0)
            .validate(false)
            .is_ok());
    }

    #[test]
    fn rejects_bad_num_points() {
        assert_rejected(TransformConfig::default().with_num_points(2048), false);
        assert_rejected(
            TransformConfig::default()
                .with_window_size(1024)
                .with_num_points(3000),
            false,
        );
    }

    #[test]
    fn rejects_normalization_for_streams() {
        let config = TransformConfig::default().with_amplitude(AmplitudeScale::Normalized);
        assert!(config.validate(false).is_ok());
        assert_rejected(config, true);
    }

    #[test]
    fn pad_geometry_defaults() {
        let config = TransformConfig::default();
        assert_eq!(config.zero_pad_len(), 0);
        assert_eq!(config.total_window_len(), 4096);
    }
}
