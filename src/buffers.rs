//! Waveform model and analysis-window extraction.

use itertools::Itertools;

use crate::config::{TransformConfig, WindowFunction};
use crate::utils::{Float, Int};
use crate::window;

pub type ChannelCount = u16;
pub type SampleRate = u32;

/// Format metadata of a decoded audio signal.
#[derive(Clone, Debug)]
pub struct AudioInfo {
    pub file_name: String,
    pub sample_rate: SampleRate,
    /// 1 (mono) or 2 (interleaved stereo).
    pub channels: ChannelCount,
    /// 8 or 16 bits per sample.
    pub bit_depth: u16,
    pub duration_ms: u64,
}

impl AudioInfo {
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Full-scale reference amplitude for this bit depth
    /// (128 for 8-bit, 32768 for 16-bit).
    pub fn max_intensity(&self) -> Float {
        (1u64 << (self.bit_depth - 1)) as Float
    }
}

/// A decoded waveform: interleaved integer samples plus format metadata.
///
/// The transform only ever reads slices of this; it is safe to share one
/// waveform across any number of batch transforms.
pub struct Waveform {
    samples: Vec<Int>,
    info: AudioInfo,
}

impl Waveform {
    pub fn new(samples: Vec<Int>, info: AudioInfo) -> Self {
        Self { samples, info }
    }

    pub fn samples(&self) -> &[Int] {
        &self.samples
    }

    pub fn info(&self) -> &AudioInfo {
        &self.info
    }

    /// Number of samples per channel.
    pub fn mono_len(&self) -> usize {
        self.samples.len() / self.info.channels as usize
    }
}

/// Per-channel distance between the starts of consecutive windows.
pub fn stride(window_size: usize, overlap: Float) -> usize {
    (window_size as Float * (1.0 - overlap)) as usize
}

/// Total number of windows a waveform of `mono_len` samples per channel
/// yields, partial last window included.
pub fn frame_count(mono_len: usize, window_size: usize, overlap: Float) -> usize {
    let windows = mono_len as Float / window_size as Float;
    (windows * (1.0 / (1.0 - overlap))).ceil() as usize
}

/// Assemble one analysis window from the start of `source`: downmix stereo
/// pairs, copy up to `window_size` samples (zero-filling what the source no
/// longer covers), leave `zero_pad_len` zeroes at the tail, and weight the
/// signal region by the coefficient table.
///
/// Sample arithmetic stays in the integer domain: the downmix average and
/// the coefficient products are rounded half away from zero, which is what
/// keeps the batch and streaming paths bit-identical.
pub fn assemble_window(
    source: &[Int],
    stereo: bool,
    window_size: usize,
    zero_pad_len: usize,
    coefficients: Option<&[Float]>,
) -> Vec<Int> {
    let mut window = vec![0; window_size + zero_pad_len];

    if stereo {
        let pairs = source.iter().tuples();
        for (slot, (&left, &right)) in window[..window_size].iter_mut().zip(pairs) {
            *slot = downmix(left, right);
        }
    } else {
        let n = source.len().min(window_size);
        window[..n].copy_from_slice(&source[..n]);
    }

    if let Some(coefficients) = coefficients {
        for (sample, &c) in window[..window_size].iter_mut().zip(coefficients) {
            *sample = (*sample as Float * c).round() as Int;
        }
    }

    window
}

/// Average a stereo pair into one sample, rounding half away from zero.
fn downmix(left: Int, right: Int) -> Int {
    ((left + right) as Float / 2.0).round() as Int
}

/// Extracts the i-th analysis window from a full-length waveform.
///
/// The coefficient table is generated once at construction; rectangular
/// windows skip the multiplication entirely.
pub struct WindowExtractor<'a> {
    wave: &'a [Int],
    stereo: bool,
    window_size: usize,
    zero_pad_len: usize,
    stride: usize,
    coefficients: Option<Vec<Float>>,
}

impl<'a> WindowExtractor<'a> {
    pub fn new(wave: &'a [Int], stereo: bool, config: &TransformConfig) -> Self {
        let coefficients = match config.window_function {
            WindowFunction::Rectangular => None,
            function => Some(window::coefficients(config.window_size, function)),
        };
        Self {
            wave,
            stereo,
            window_size: config.window_size,
            zero_pad_len: config.zero_pad_len(),
            stride: stride(config.window_size, config.overlap),
            coefficients,
        }
    }

    /// The `i`-th window: `window_size` samples starting at
    /// `i * stride * channels`, zero-filled past the end of the signal,
    /// followed by `zero_pad_len` zeroes.
    pub fn extract(&self, i: usize) -> Vec<Int> {
        let channels = if self.stereo { 2 } else { 1 };
        let start = (i * self.stride * channels).min(self.wave.len());
        assemble_window(
            &self.wave[start..],
            self.stereo,
            self.window_size,
            self.zero_pad_len,
            self.coefficients.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;

    fn rect_config(window_size: usize, overlap: Float) -> TransformConfig {
        TransformConfig::default()
            .with_window_size(window_size)
            .with_window_function(WindowFunction::Rectangular)
            .with_overlap(overlap)
    }

    #[test]
    fn partial_last_window_is_zero_filled() {
        let wave = [1, 2, 3, 4, 5, 6];
        let extractor = WindowExtractor::new(&wave, false, &rect_config(4, 0.0));
        assert_eq!(extractor.extract(0), vec![1, 2, 3, 4]);
        assert_eq!(extractor.extract(1), vec![5, 6, 0, 0]);
    }

    #[test]
    fn overlap_strides_through_the_waveform() {
        let wave: Vec<Int> = (1..=12).collect();
        let extractor = WindowExtractor::new(&wave, false, &rect_config(4, 0.5));
        assert_eq!(extractor.extract(0), vec![1, 2, 3, 4]);
        assert_eq!(extractor.extract(1), vec![3, 4, 5, 6]);
        assert_eq!(extractor.extract(2), vec![5, 6, 7, 8]);
        assert_eq!(extractor.extract(3), vec![7, 8, 9, 10]);
        assert_eq!(extractor.extract(4), vec![9, 10, 11, 12]);
        // the frame-count formula rounds up, so one trailing window remains
        assert_eq!(frame_count(12, 4, 0.5), 6);
        assert_eq!(extractor.extract(5), vec![11, 12, 0, 0]);
    }

    #[test]
    fn stereo_pairs_average_into_mono() {
        let wave = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110];
        let extractor = WindowExtractor::new(&wave, true, &rect_config(6, 0.0));
        assert_eq!(extractor.extract(0), vec![5, 25, 45, 65, 85, 105]);
    }

    #[test]
    fn downmix_rounds_half_away_from_zero() {
        assert_eq!(downmix(0, 3), 2);
        assert_eq!(downmix(0, -3), -2);
        assert_eq!(downmix(-3, 0), -2);
        assert_eq!(downmix(2, 3), 3);
        assert_eq!(downmix(-2, -3), -3);
        assert_eq!(downmix(4, 6), 5);
    }

    #[test]
    fn hann_window_weights_and_rounds_samples() {
        let wave = [100; 8];
        let config = rect_config(8, 0.0).with_window_function(WindowFunction::Hann);
        let extractor = WindowExtractor::new(&wave, false, &config);
        assert_eq!(extractor.extract(0), vec![0, 19, 61, 95, 95, 61, 19, 0]);
    }

    #[test]
    fn zero_padding_extends_the_window() {
        let wave = [9, 9, 9, 9, 9, 9];
        let config = rect_config(4, 0.0).with_num_points(8);
        let extractor = WindowExtractor::new(&wave, false, &config);
        assert_eq!(extractor.extract(0), vec![9, 9, 9, 9, 0, 0, 0, 0]);
        // the partial window zero-fills before the padding region starts
        assert_eq!(extractor.extract(1), vec![9, 9, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn padding_region_is_not_windowed() {
        let wave = [100; 4];
        let config = rect_config(4, 0.0)
            .with_num_points(8)
            .with_window_function(WindowFunction::Hamming);
        let extractor = WindowExtractor::new(&wave, false, &config);
        let window = extractor.extract(0);
        assert_eq!(&window[4..], &[0, 0, 0, 0]);
        // hamming(4) = [0.08, 0.77, 0.77, 0.08] scaled onto 100
        assert_eq!(&window[..4], &[8, 77, 77, 8]);
    }

    #[test]
    fn windows_past_the_signal_are_silent() {
        let wave = [1, 2, 3, 4];
        let extractor = WindowExtractor::new(&wave, false, &rect_config(4, 0.5));
        assert_eq!(frame_count(4, 4, 0.5), 2);
        assert_eq!(extractor.extract(1), vec![3, 4, 0, 0]);
        assert_eq!(extractor.extract(2), vec![0, 0, 0, 0]);
    }

    #[test]
    fn stride_floors_fractional_hops() {
        assert_eq!(stride(4, 0.0), 4);
        assert_eq!(stride(4, 0.5), 2);
        assert_eq!(stride(16, 0.3), 11);
        assert_eq!(stride(4096, 0.75), 1024);
    }

    #[test]
    fn frame_count_matches_formula() {
        assert_eq!(frame_count(6, 4, 0.0), 2);
        assert_eq!(frame_count(8, 4, 0.0), 2);
        assert_eq!(frame_count(8, 4, 0.5), 4);
        assert_eq!(frame_count(3, 4, 0.0), 1);
        assert_eq!(frame_count(0, 4, 0.0), 0);
    }

    #[test]
    fn max_intensity_tracks_bit_depth() {
        let mut info = AudioInfo {
            file_name: "test.wav".into(),
            sample_rate: 44100,
            channels: 1,
            bit_depth: 16,
            duration_ms: 0,
        };
        assert_eq!(info.max_intensity(), 32768.0);
        info.bit_depth = 8;
        assert_eq!(info.max_intensity(), 128.0);
    }
}
