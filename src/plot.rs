use std::path::Path;

use ndarray::Array2;
use plotters::prelude::*;

use crate::output::TransformResult;
use crate::utils::Float;

/// Render a transform result as a spectrogram PNG: time on the x axis in
/// seconds, frequency up to Nyquist on the y axis, amplitude as color.
pub fn render_spectrogram(
    fname: &Path,
    result: &TransformResult,
) -> Result<(), Box<dyn std::error::Error>> {
    let arr = result.to_matrix();
    let (ntimes, npts) = arr.dim();
    if ntimes == 0 || npts == 0 {
        return Ok(());
    }

    // axis limits and step sizes
    let hop_s = result.meta.window_duration_ms * (1.0 - result.meta.config.overlap) / 1000.0;
    let fstep = result.meta.frequency_resolution;
    let t_end = ntimes as Float * hop_s;
    let f_end = result.meta.sample_rate as Float * 0.5;

    let root = BitMapBackend::new(fname, (1440, 1080)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_end, 0.0..f_end)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("time (s)")
        .y_desc("frequency (hz)")
        .draw()?;

    // map amplitudes onto [0, 1] for the colormap
    let (lo, hi) = amplitude_bounds(&arr);
    let span = (hi - lo).max(Float::MIN_POSITIVE);

    chart.draw_series(
        (0..ntimes)
            .flat_map(|it| std::iter::repeat(it).zip(0..npts))
            .map(|(it, ix)| {
                let t0 = it as Float * hop_s;
                let f0 = ix as Float * fstep;
                let shade = (arr[[it, ix]] - lo) / span;
                Rectangle::new(
                    [(t0, f0), (t0 + hop_s, f0 + fstep)],
                    VulcanoHSL::get_color(shade).filled(),
                )
            }),
    )?;

    root.present()?;
    Ok(())
}

fn amplitude_bounds(arr: &Array2<Float>) -> (Float, Float) {
    let lo = arr.iter().fold(Float::INFINITY, |a, &b| a.min(b));
    let hi = arr.iter().fold(Float::NEG_INFINITY, |a, &b| a.max(b));
    (lo, hi)
}
