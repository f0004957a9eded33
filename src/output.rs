//! Transform output: frames, frequency bins and result metadata.

use std::fmt;

use ndarray::Array2;

use crate::buffers::{AudioInfo, SampleRate};
use crate::config::TransformConfig;
use crate::utils::{samples_to_ms, Float};

/// One discrete frequency slot of a frame.
#[derive(Clone, Debug)]
pub struct FrequencyBin {
    /// Start frequency of the bin in hz (bin index times the frequency
    /// resolution).
    pub frequency: Float,
    /// Amplitude of the signal at this frequency. Rescaled in place by the
    /// decibel / normalization post-passes.
    pub amplitude: Float,
}

/// FFT output for a single sample window.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Position of the window's first sample in the original signal.
    pub start_ms: Float,
    /// End of the window, clamped to the signal's true duration; only the
    /// final (zero-filled) window is ever clamped.
    pub end_ms: Float,
    /// The lower half-spectrum, `total_window_len / 2` bins. The input is
    /// real-valued, so the upper half carries no extra information.
    pub bins: Vec<FrequencyBin>,
}

/// Metadata shared by batch results and frame streams.
#[derive(Clone, Debug)]
pub struct TransformMeta {
    pub file_name: String,
    pub file_duration_ms: u64,
    pub sample_rate: SampleRate,
    /// Hz covered by each bin: sample rate over total window length.
    pub frequency_resolution: Float,
    /// Length of each sampling window in milliseconds (zero padding adds
    /// points to the FFT, not time to the window).
    pub window_duration_ms: Float,
    pub config: TransformConfig,
}

impl TransformMeta {
    pub fn new(info: &AudioInfo, config: &TransformConfig) -> Self {
        let fs = info.sample_rate as Float;
        Self {
            file_name: info.file_name.clone(),
            file_duration_ms: info.duration_ms,
            sample_rate: info.sample_rate,
            frequency_resolution: fs / config.total_window_len() as Float,
            window_duration_ms: samples_to_ms(config.window_size, fs),
            config: config.clone(),
        }
    }
}

impl fmt::Display for TransformMeta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(f, "Sample rate: {} Hz", self.sample_rate)?;
        writeln!(f, "Frequency resolution: {:.3} Hz", self.frequency_resolution)?;
        writeln!(f, "Window function: {}", self.config.window_function)?;
        writeln!(f, "Window duration: {:.1} ms", self.window_duration_ms)?;
        if self.config.overlap == 0.0 {
            writeln!(f, "Window overlap: none")?;
        } else {
            writeln!(f, "Window overlap: {}%", self.config.overlap * 100.0)?;
        }
        match self.config.num_points {
            Some(num_points) => writeln!(
                f,
                "Points per FFT: {} samples + {} zero padding = {}",
                self.config.window_size,
                self.config.zero_pad_len(),
                num_points
            ),
            None => writeln!(f, "Points per FFT: {}", self.config.window_size),
        }
    }
}

/// Every frame of a waveform, computed eagerly, plus metadata.
pub struct TransformResult {
    pub meta: TransformMeta,
    pub frames: Vec<Frame>,
}

impl TransformResult {
    /// Bin amplitudes as a `(time, frequency)` matrix for rendering.
    pub fn to_matrix(&self) -> Array2<Float> {
        let bins = self.frames.first().map_or(0, |frame| frame.bins.len());
        let mut arr = Array2::zeros((self.frames.len(), bins));
        for (t, frame) in self.frames.iter().enumerate() {
            for (i, bin) in frame.bins.iter().enumerate() {
                arr[[t, i]] = bin.amplitude;
            }
        }
        arr
    }
}

impl fmt::Display for TransformResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.meta)?;
        writeln!(f, "Frames: {}", self.frames.len())
    }
}
