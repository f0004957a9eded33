//! Lazy frame-by-frame computation over a sample source.

use log::debug;

use crate::buffers::{assemble_window, frame_count, AudioInfo};
use crate::config::{TransformConfig, WindowFunction};
use crate::output::{Frame, TransformMeta};
use crate::spectral::build_frame;
use crate::utils::{Float, Int};
use crate::window;
use crate::Error;

/// A pull-based supplier of decoded samples.
///
/// Reads may come up short; a short read means the source has ended and no
/// further samples will ever arrive. `has_remaining` is the cheap
/// "unread samples exist" hint the stream consults between frames.
pub trait SampleSource {
    /// Fill as much of `out` as possible, returning how many samples were
    /// written.
    fn read_samples(&mut self, out: &mut [Int]) -> Result<usize, Error>;

    /// Whether any unread samples remain.
    fn has_remaining(&self) -> bool;
}

/// In-memory source over an already-decoded sample vector.
pub struct WaveformSource {
    samples: Vec<Int>,
    pos: usize,
}

impl WaveformSource {
    pub fn new(samples: Vec<Int>) -> Self {
        Self { samples, pos: 0 }
    }
}

impl SampleSource for WaveformSource {
    fn read_samples(&mut self, out: &mut [Int]) -> Result<usize, Error> {
        let n = out.len().min(self.samples.len() - self.pos);
        out[..n].copy_from_slice(&self.samples[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.samples.len()
    }
}

/// Computes frames incrementally, buffering only one window of samples.
///
/// The cursor moves through four phases: priming (no buffer yet), sliding
/// (source still supplying), draining (source ended, counted frames still
/// owed, slides feed zeroes) and exhausted. The total frame count is not
/// known until the source ends; it is derived from the consumed sample
/// count with the same formula the batch transform uses, so the two modes
/// agree frame for frame.
pub struct FrameStream<S> {
    source: S,
    info: AudioInfo,
    config: TransformConfig,
    meta: TransformMeta,
    /// Interleaved window buffer, `window_size * channels` samples once
    /// primed.
    buffer: Vec<Int>,
    /// Interleaved samples carried over between consecutive windows.
    retain: usize,
    coefficients: Option<Vec<Float>>,
    consumed: usize,
    frames_produced: usize,
    expected_frames: Option<usize>,
    current_ms: Float,
    primed: bool,
}

impl<S: SampleSource> FrameStream<S> {
    pub fn new(source: S, info: AudioInfo, config: TransformConfig) -> Result<Self, Error> {
        config.validate(true)?;

        let meta = TransformMeta::new(&info, &config);
        let channels = info.channels as usize;
        let retain =
            (config.window_size as Float * config.overlap).round() as usize * channels;
        let coefficients = match config.window_function {
            WindowFunction::Rectangular => None,
            function => Some(window::coefficients(config.window_size, function)),
        };

        Ok(Self {
            source,
            info,
            config,
            meta,
            buffer: Vec::new(),
            retain,
            coefficients,
            consumed: 0,
            frames_produced: 0,
            expected_frames: None,
            current_ms: 0.0,
            primed: false,
        })
    }

    pub fn meta(&self) -> &TransformMeta {
        &self.meta
    }

    pub fn frames_produced(&self) -> usize {
        self.frames_produced
    }

    /// True while another frame is owed: the source still has samples, or
    /// the source has ended and fewer than the expected number of frames
    /// have been handed out.
    pub fn has_next(&self) -> bool {
        match self.expected_frames {
            Some(expected) => self.frames_produced < expected,
            None => self.source.has_remaining(),
        }
    }

    /// Compute the next frame.
    ///
    /// The first call reads a full window; later calls shift the overlap
    /// tail to the front and read only the samples needed to complete the
    /// window. Calling after `has_next` turns false is an error.
    pub fn next_frame(&mut self) -> Result<Frame, Error> {
        if !self.has_next() {
            return Err(Error::StreamExhausted);
        }

        let channels = self.info.channels as usize;
        let window_len = self.config.window_size * channels;

        if !self.primed {
            self.buffer = vec![0; window_len];
            self.primed = true;
            let got = self.fill(0)?;
            debug!("primed stream buffer with {} of {} samples", got, window_len);
        } else {
            let kept = self.retain.min(window_len);
            self.buffer.copy_within(window_len - kept.., 0);
            for sample in &mut self.buffer[kept..] {
                *sample = 0;
            }
            self.fill(kept)?;
        }

        let sample_window = assemble_window(
            &self.buffer,
            self.info.is_stereo(),
            self.config.window_size,
            self.config.zero_pad_len(),
            self.coefficients.as_deref(),
        );
        let frame = build_frame(
            &sample_window,
            self.current_ms,
            self.meta.window_duration_ms,
            &self.info,
            &self.config,
        );

        self.current_ms += self.meta.window_duration_ms * (1.0 - self.config.overlap);
        self.frames_produced += 1;
        Ok(frame)
    }

    /// Pull samples from the source into `buffer[offset..]`. The first time
    /// the source comes up short (or reports nothing left after a full
    /// read), the expected frame count is fixed from the consumed total.
    fn fill(&mut self, offset: usize) -> Result<usize, Error> {
        let requested = self.buffer.len() - offset;
        let got = if requested > 0 && self.expected_frames.is_none() {
            self.source.read_samples(&mut self.buffer[offset..])?
        } else {
            0
        };
        self.consumed += got;

        if self.expected_frames.is_none() && (got < requested || !self.source.has_remaining()) {
            let mono_len = self.consumed / self.info.channels as usize;
            let expected = frame_count(mono_len, self.config.window_size, self.config.overlap);
            self.expected_frames = Some(expected);
            debug!(
                "source ended after {} samples; {} frames expected",
                self.consumed, expected
            );
        }
        Ok(got)
    }
}

impl<S: SampleSource> Iterator for FrameStream<S> {
    type Item = Result<Frame, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            Some(self.next_frame())
        } else {
            None
        }
    }
}
