//! WAV reading: a whole-file decode for the batch transform and a
//! [`SampleSource`] for frame streams.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::{read_wave_header, WavReader};
use num_traits::AsPrimitive;

use crate::buffers::{AudioInfo, Waveform};
use crate::stream::SampleSource;
use crate::utils::{Float, Int};
use crate::Error;

/// Cheap header check without decoding any samples.
pub fn check_wav<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    let mut f = File::open(path)?;
    read_wave_header(&mut f)?;
    Ok(())
}

/// Decode an entire wav file into a waveform.
pub fn read_waveform<P: AsRef<Path>>(path: P) -> Result<Waveform, Error> {
    let mut reader = WavReader::open(&path)?;
    let info = audio_info(&path, &reader);

    // decode at the stored width, then widen
    let spec = reader.spec();
    let samples = match spec.bits_per_sample {
        8 => collect_samples::<i8, _>(&mut reader)?,
        16 => collect_samples::<i16, _>(&mut reader)?,
        _ => collect_samples::<Int, _>(&mut reader)?,
    };

    Ok(Waveform::new(samples, info))
}

/// Open a wav file for streaming without decoding it up front.
pub fn open_wav<P: AsRef<Path>>(path: P) -> Result<(AudioInfo, WavSampleSource), Error> {
    let reader = WavReader::open(&path)?;
    let info = audio_info(&path, &reader);
    let remaining = reader.len();
    Ok((info, WavSampleSource { reader, remaining }))
}

fn audio_info<P: AsRef<Path>, R: Read>(path: P, reader: &WavReader<R>) -> AudioInfo {
    let spec = reader.spec();
    let frames = reader.duration();
    AudioInfo {
        file_name: path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bit_depth: spec.bits_per_sample,
        duration_ms: (frames as Float * 1000.0 / spec.sample_rate as Float).round() as u64,
    }
}

fn collect_samples<S, R>(reader: &mut WavReader<R>) -> Result<Vec<Int>, hound::Error>
where
    S: hound::Sample + AsPrimitive<Int>,
    R: Read,
{
    reader
        .samples::<S>()
        .map(|sample| sample.map(|s| s.as_()))
        .collect()
}

/// Streams samples straight off a wav file's data chunk.
pub struct WavSampleSource {
    reader: WavReader<BufReader<File>>,
    remaining: u32,
}

impl SampleSource for WavSampleSource {
    fn read_samples(&mut self, out: &mut [Int]) -> Result<usize, Error> {
        let mut n = 0;
        let mut samples = self.reader.samples::<Int>();
        for slot in out.iter_mut() {
            match samples.next() {
                Some(sample) => {
                    *slot = sample?;
                    n += 1;
                }
                None => break,
            }
        }
        self.remaining -= n as u32;
        Ok(n)
    }

    fn has_remaining(&self) -> bool {
        self.remaining > 0
    }
}
