//! Frame construction and the eager batch transform.

use log::debug;

use crate::buffers::{frame_count, AudioInfo, Waveform, WindowExtractor};
use crate::config::{AmplitudeScale, TransformConfig};
use crate::fft::fft_in_place;
use crate::output::{Frame, FrequencyBin, TransformMeta, TransformResult};
use crate::utils::{CFloat, Float, Int};
use crate::Error;

/// Floor for decibel amplitudes, keeping silent bins finite.
pub const DB_FLOOR: Float = -100.0;

/// Build one calibrated frame from an extracted (possibly zero-padded)
/// window.
///
/// The window is transformed in place, the lower half-spectrum is kept, and
/// each magnitude is scaled by 2/N (single-sided amplitude). Per-frame
/// post-processing happens here too: the 8-bit DC correction first, then
/// decibel scaling. Global normalization is a whole-result pass and lives
/// in [`transform`].
pub(crate) fn build_frame(
    window: &[Int],
    start_ms: Float,
    window_duration_ms: Float,
    info: &AudioInfo,
    config: &TransformConfig,
) -> Frame {
    let mut buf: Vec<CFloat> = window
        .iter()
        .map(|&s| CFloat::new(s as Float, 0.0))
        .collect();
    fft_in_place(&mut buf);

    let n = buf.len();
    let increment = info.sample_rate as Float / n as Float;
    let scale = 2.0 / n as Float;
    let mut bins: Vec<FrequencyBin> = buf[..n / 2]
        .iter()
        .enumerate()
        .map(|(i, x)| FrequencyBin {
            frequency: i as Float * increment,
            amplitude: x.norm() * scale,
        })
        .collect();

    if config.bin0_correction && info.bit_depth == 8 && bins.len() > 1 {
        bins[0].amplitude = bins[1].amplitude;
    }

    if config.amplitude == AmplitudeScale::Decibel {
        scale_decibel(&mut bins, info.max_intensity());
    }

    let end_ms = (start_ms + window_duration_ms).min(info.duration_ms as Float);
    Frame { start_ms, end_ms, bins }
}

/// Rescale amplitudes to decibels relative to the full-scale reference.
fn scale_decibel(bins: &mut [FrequencyBin], max_intensity: Float) {
    for bin in bins {
        bin.amplitude = (10.0 * (bin.amplitude / max_intensity).log10()).max(DB_FLOOR);
    }
}

/// Divide every amplitude by the largest one found across all frames.
fn normalize(frames: &mut [Frame]) {
    let max_amplitude = frames
        .iter()
        .flat_map(|frame| frame.bins.iter())
        .map(|bin| bin.amplitude)
        .fold(0.0, Float::max);
    if max_amplitude > 0.0 {
        for bin in frames.iter_mut().flat_map(|frame| frame.bins.iter_mut()) {
            bin.amplitude /= max_amplitude;
        }
    }
}

/// Compute every frame of `waveform` eagerly.
///
/// Frames come out in start-time order. The normalized amplitude scale
/// needs the global maximum, so it runs as a second pass over the already
/// built frame set.
pub fn transform(waveform: &Waveform, config: &TransformConfig) -> Result<TransformResult, Error> {
    config.validate(false)?;

    let info = waveform.info();
    let meta = TransformMeta::new(info, config);
    let count = frame_count(waveform.mono_len(), config.window_size, config.overlap);
    debug!(
        "batch transform of {}: {} frames, {} points each, {:.3} hz resolution",
        meta.file_name,
        count,
        config.total_window_len(),
        meta.frequency_resolution
    );

    let extractor = WindowExtractor::new(waveform.samples(), info.is_stereo(), config);
    let mut frames = Vec::with_capacity(count);
    let mut current_ms: Float = 0.0;
    for i in 0..count {
        let window = extractor.extract(i);
        frames.push(build_frame(
            &window,
            current_ms,
            meta.window_duration_ms,
            info,
            config,
        ));
        current_ms += meta.window_duration_ms * (1.0 - config.overlap);
    }

    if config.amplitude == AmplitudeScale::Normalized {
        normalize(&mut frames);
    }

    Ok(TransformResult { meta, frames })
}
