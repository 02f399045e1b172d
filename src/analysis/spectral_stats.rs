use ndarray::Array2;

use super::stft::SpectralGrid;

/// Lowest frequency of the first octave contrast band; everything below is
/// the residual band.
const CONTRAST_FMIN_HZ: f32 = 200.0;
const CONTRAST_EPSILON: f64 = 1e-10;

/// Per-frame spectral roll-off: the frequency below which
/// `fraction` of the frame's cumulative magnitude is concentrated.
/// Zero-energy frames report 0 Hz.
pub(crate) fn rolloff_hz(grid: &SpectralGrid, fraction: f32) -> Vec<f32> {
    let n_frames = grid.n_frames();
    let mut out = Vec::with_capacity(n_frames);
    for frame in 0..n_frames {
        let mut total = 0.0_f64;
        for bin in 0..grid.n_bins() {
            total += grid.magnitude[[bin, frame]].max(0.0) as f64;
        }
        if total <= 0.0 {
            out.push(0.0);
            continue;
        }
        let target = total * fraction as f64;
        let mut cumulative = 0.0_f64;
        let mut rolloff = grid.bin_freqs[grid.n_bins() - 1];
        for bin in 0..grid.n_bins() {
            cumulative += grid.magnitude[[bin, frame]].max(0.0) as f64;
            if cumulative >= target {
                rolloff = grid.bin_freqs[bin];
                break;
            }
        }
        out.push(rolloff);
    }
    out
}

/// Octave-band spectral contrast, shape `(n_bands + 1, n_frames)`.
///
/// Band 0 is the residual below 200 Hz, then octave-doubling bands up to
/// Nyquist. Per band: `10 * log10(peak / valley)` where peak/valley are the
/// means of the top/bottom `quantile` share of the band's power values.
pub(crate) fn contrast_matrix(grid: &SpectralGrid, n_bands: usize, quantile: f32) -> Array2<f32> {
    let ranges = band_bin_ranges(grid, n_bands);
    let n_frames = grid.n_frames();
    let mut contrast = Array2::<f32>::zeros((ranges.len(), n_frames));
    let mut band_power: Vec<f32> = Vec::new();

    for (row, &(lo, hi)) in ranges.iter().enumerate() {
        for frame in 0..n_frames {
            if hi <= lo {
                continue;
            }
            band_power.clear();
            band_power.extend((lo..hi).map(|bin| grid.power[[bin, frame]].max(0.0)));
            band_power.sort_by(f32::total_cmp);

            let take = ((quantile * band_power.len() as f32).round() as usize).max(1);
            let valley = mean(&band_power[..take]);
            let peak = mean(&band_power[band_power.len() - take..]);
            contrast[[row, frame]] =
                (10.0 * ((peak + CONTRAST_EPSILON) / (valley + CONTRAST_EPSILON)).log10()) as f32;
        }
    }
    contrast
}

/// Half-open bin ranges `[lo, hi)` for the residual band plus each octave
/// band, clamped to the grid.
fn band_bin_ranges(grid: &SpectralGrid, n_bands: usize) -> Vec<(usize, usize)> {
    let nyquist = grid.sample_rate as f32 * 0.5;
    let mut edges = Vec::with_capacity(n_bands + 2);
    edges.push(0.0_f32);
    for band in 0..n_bands {
        edges.push((CONTRAST_FMIN_HZ * 2.0_f32.powi(band as i32)).min(nyquist));
    }
    edges.push(nyquist);

    let n_bins = grid.frame_size / 2 + 1;
    edges
        .windows(2)
        .map(|pair| {
            let lo = freq_to_bin(pair[0], grid.sample_rate, grid.frame_size);
            let hi = if pair[1] >= nyquist {
                n_bins
            } else {
                freq_to_bin(pair[1], grid.sample_rate, grid.frame_size)
            };
            (lo, hi.min(n_bins))
        })
        .collect()
}

fn freq_to_bin(freq_hz: f32, sample_rate: u32, frame_size: usize) -> usize {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let freq = freq_hz.clamp(0.0, nyquist);
    (((freq * frame_size as f32) / sample_rate.max(1) as f32).floor() as usize)
        .min(frame_size / 2)
}

fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::WindowKind;
    use crate::analysis::stft;
    use std::f32::consts::PI;

    fn sine(freq: f32, sr: u32, seconds: f32) -> Vec<f32> {
        (0..(sr as f32 * seconds) as usize)
            .map(|i| (2.0 * PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    #[test]
    fn rolloff_sits_near_a_pure_tone() {
        let sr = 22_050_u32;
        let samples = sine(1_000.0, sr, 0.5);
        let grid = stft::compute_grid(&samples, sr, 2048, 512, WindowKind::Hann);
        let rolloff = rolloff_hz(&grid, 0.85);
        let mid = rolloff[rolloff.len() / 2];
        assert!(
            (900.0..1_200.0).contains(&mid),
            "roll-off {mid} Hz far from tone"
        );
    }

    #[test]
    fn rolloff_of_silence_is_zero() {
        let samples = vec![0.0_f32; 4096];
        let grid = stft::compute_grid(&samples, 16_000, 1024, 512, WindowKind::Hann);
        assert!(rolloff_hz(&grid, 0.85).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn contrast_has_one_residual_plus_octave_bands() {
        let samples = sine(440.0, 22_050, 0.25);
        let grid = stft::compute_grid(&samples, 22_050, 2048, 512, WindowKind::Hann);
        let contrast = contrast_matrix(&grid, 6, 0.02);
        assert_eq!(contrast.nrows(), 7);
        assert_eq!(contrast.ncols(), grid.n_frames());
        assert!(contrast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn tone_band_shows_more_contrast_than_silence() {
        let sr = 22_050_u32;
        let samples = sine(440.0, sr, 0.5);
        let grid = stft::compute_grid(&samples, sr, 2048, 512, WindowKind::Hann);
        let contrast = contrast_matrix(&grid, 6, 0.02);
        let mid = contrast.ncols() / 2;
        // 440 Hz falls in the 400-800 Hz band (row 2 after the residual).
        assert!(contrast[[2, mid]] > 10.0);

        let silent = vec![0.0_f32; sr as usize / 2];
        let silent_grid = stft::compute_grid(&silent, sr, 2048, 512, WindowKind::Hann);
        let silent_contrast = contrast_matrix(&silent_grid, 6, 0.02);
        assert!(silent_contrast.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn band_ranges_cover_the_grid_without_overlap() {
        let samples = vec![0.1_f32; 2048];
        let grid = stft::compute_grid(&samples, 44_100, 2048, 512, WindowKind::Hann);
        let ranges = band_bin_ranges(&grid, 6);
        assert_eq!(ranges.len(), 7);
        for pair in ranges.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
        assert_eq!(ranges.last().unwrap().1, 1025);
    }
}
