//! Turn decoded PCM audio into a sequence of frequency-domain frames.
//!
//! The same computation is exposed two ways: [`spectral::transform`] works
//! over a fully decoded [`buffers::Waveform`] and returns every frame at
//! once, while [`stream::FrameStream`] pulls samples lazily from a
//! [`stream::SampleSource`] and computes one frame per call. For the same
//! input and config the two produce matching frames.

pub mod buffers;
pub mod config;
pub mod fft;
pub mod fileio;
pub mod output;
pub mod plot;
pub mod spectral;
pub mod stream;
pub mod utils;
pub mod window;

use std::path::Path;

use thiserror::Error as ThisError;

use crate::config::TransformConfig;
use crate::fileio::WavSampleSource;
use crate::output::TransformResult;
use crate::stream::FrameStream;

pub use crate::utils::{CFloat, Float};

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid transform parameters; raised before any computation starts.
    #[error("invalid transform config: {0}")]
    Config(String),

    /// The audio decoder failed. The transform aborts; nothing is retried.
    #[error("audio source error: {0}")]
    Source(#[from] hound::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// `next_frame` was called on a stream whose `has_next` is false.
    #[error("frame stream is exhausted")]
    StreamExhausted,
}

/// Read a wav file and compute every frame eagerly.
pub fn transform_file<P: AsRef<Path>>(
    path: P,
    config: &TransformConfig,
) -> Result<TransformResult, Error> {
    let waveform = fileio::read_waveform(path)?;
    spectral::transform(&waveform, config)
}

/// Open a wav file for lazy frame-by-frame computation.
pub fn stream_file<P: AsRef<Path>>(
    path: P,
    config: &TransformConfig,
) -> Result<FrameStream<WavSampleSource>, Error> {
    let (info, source) = fileio::open_wav(path)?;
    FrameStream::new(source, info, config.clone())
}
