use std::env;
use std::path::Path;

use specgram::config::TransformConfig;
use specgram::fileio::check_wav;
use specgram::plot::render_spectrogram;
use specgram::transform_file;

const HELP: &str = "usage: specgram [input wav] [output png]";

fn main() {
    env_logger::init();

    // handle input args
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", HELP);
        return;
    }
    let wav_in = Path::new(args.get(1).unwrap());
    check_wav(wav_in).expect("input WAV is invalid");

    let result = transform_file(wav_in, &TransformConfig::default())
        .expect("transform failed");
    eprintln!("Loaded {}", wav_in.display());
    print!("{}", result);

    // optionally render a spectrogram image
    if let Some(out) = args.get(2) {
        let outpath = Path::new(out);
        render_spectrogram(outpath, &result).expect("spectrogram rendering failed");
        eprintln!("Wrote spectrogram to {} ...", outpath.display());
    }
}
