use super::stft::SpectralGrid;

/// Per-frame dominant frequency via spectral peak picking.
///
/// Scans interior bins for local magnitude maxima, keeps the strongest, and
/// refines its frequency with parabolic interpolation over the neighboring
/// bins. Frames whose strongest peak does not clear `min_magnitude` report
/// 0.0 (unvoiced).
pub(crate) fn frame_pitches(grid: &SpectralGrid, min_magnitude: f32) -> Vec<f32> {
    let n_frames = grid.n_frames();
    let n_bins = grid.n_bins();
    let mut pitches = Vec::with_capacity(n_frames);
    for frame in 0..n_frames {
        let mut best_bin = 0usize;
        let mut best_mag = 0.0_f32;
        for bin in 1..n_bins.saturating_sub(1) {
            let mag = grid.magnitude[[bin, frame]];
            if mag > grid.magnitude[[bin - 1, frame]]
                && mag >= grid.magnitude[[bin + 1, frame]]
                && mag > best_mag
            {
                best_mag = mag;
                best_bin = bin;
            }
        }
        if best_bin == 0 || best_mag <= min_magnitude {
            pitches.push(0.0);
            continue;
        }
        let refined = best_bin as f32
            + parabolic_offset(
                grid.magnitude[[best_bin - 1, frame]],
                best_mag,
                grid.magnitude[[best_bin + 1, frame]],
            );
        pitches.push(refined * grid.sample_rate as f32 / grid.frame_size as f32);
    }
    pitches
}

/// Mean of the strictly positive frame pitches; `None` when every frame is
/// unvoiced.
pub(crate) fn representative_pitch(pitches: &[f32]) -> Option<f32> {
    let mut sum = 0.0_f64;
    let mut voiced = 0usize;
    for &pitch in pitches {
        if pitch > 0.0 {
            sum += pitch as f64;
            voiced += 1;
        }
    }
    if voiced == 0 {
        None
    } else {
        Some((sum / voiced as f64) as f32)
    }
}

/// Vertex offset in (-0.5, 0.5) of the parabola through three equally spaced
/// magnitudes centered on the peak.
fn parabolic_offset(left: f32, center: f32, right: f32) -> f32 {
    let denom = left - 2.0 * center + right;
    if denom.abs() <= f32::EPSILON {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}
