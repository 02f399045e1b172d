use ndarray::Array2;
use rustfft::{FftPlanner, num_complex::Complex32};

use super::config::{AnalysisConfig, WindowKind};
use super::frame;

/// Magnitude and power spectra for every frame, in time order.
///
/// Grids are laid out `(bins, frames)` with `bins = frame_size / 2 + 1`
/// (non-negative frequencies of a real input).
pub(crate) struct SpectralGrid {
    pub(crate) magnitude: Array2<f32>,
    pub(crate) power: Array2<f32>,
    pub(crate) bin_freqs: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) frame_size: usize,
}

impl SpectralGrid {
    pub(crate) fn n_frames(&self) -> usize {
        self.magnitude.ncols()
    }

    pub(crate) fn n_bins(&self) -> usize {
        self.magnitude.nrows()
    }
}

pub(crate) fn compute_grid(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    window_kind: WindowKind,
) -> SpectralGrid {
    let n_frames = frame::frame_count(samples.len(), frame_size, hop_size);
    let n_bins = frame_size / 2 + 1;
    let window = frame::build_window(window_kind, frame_size);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut magnitude = Array2::<f32>::zeros((n_bins, n_frames));
    let mut power = Array2::<f32>::zeros((n_bins, n_frames));
    let mut windowed = vec![0.0_f32; frame_size];
    let mut buffer = vec![Complex32::new(0.0, 0.0); frame_size];
    let mut scratch = vec![Complex32::new(0.0, 0.0); fft.get_inplace_scratch_len()];

    for frame_idx in 0..n_frames {
        let start = frame_idx * hop_size;
        frame::fill_windowed(&mut windowed, samples, start, &window);
        for (cell, &value) in buffer.iter_mut().zip(&windowed) {
            *cell = Complex32::new(value, 0.0);
        }
        fft.process_with_scratch(&mut buffer, &mut scratch);
        for bin in 0..n_bins {
            let p = (buffer[bin].norm_sqr()).max(0.0);
            power[[bin, frame_idx]] = p;
            magnitude[[bin, frame_idx]] = p.sqrt();
        }
    }

    let bin_freqs = (0..n_bins)
        .map(|bin| bin as f32 * sample_rate as f32 / frame_size as f32)
        .collect();

    SpectralGrid {
        magnitude,
        power,
        bin_freqs,
        sample_rate,
        frame_size,
    }
}

pub(crate) fn compute_grid_with(samples: &[f32], sample_rate: u32, config: &AnalysisConfig) -> SpectralGrid {
    compute_grid(
        samples,
        sample_rate,
        config.frame_size,
        config.hop_size,
        config.window,
    )
}

/// Convert a magnitude grid to dB relative to its own peak.
///
/// `20 * log10(m / reference)` with the grid maximum as reference; zero
/// magnitudes (and a silent grid) land on `db_floor` instead of -inf.
pub(crate) fn amplitude_to_db(magnitude: &Array2<f32>, db_floor: f32) -> Array2<f32> {
    scale_to_db(magnitude, db_floor, 20.0)
}

/// Same convention for a power grid: `10 * log10(p / reference)`.
pub(crate) fn power_to_db(power: &Array2<f32>, db_floor: f32) -> Array2<f32> {
    scale_to_db(power, db_floor, 10.0)
}

fn scale_to_db(grid: &Array2<f32>, db_floor: f32, factor: f32) -> Array2<f32> {
    let reference = grid.iter().copied().fold(0.0_f32, f32::max);
    if reference <= 0.0 {
        return Array2::from_elem(grid.raw_dim(), db_floor);
    }
    grid.mapv(|value| {
        if value <= 0.0 {
            db_floor
        } else {
            (factor * (value / reference).log10()).max(db_floor)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let len = (sample_rate as f32 * seconds) as usize;
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn grid_shape_matches_frame_arithmetic() {
        let samples = sine(440.0, 22_050, 0.5);
        let grid = compute_grid(&samples, 22_050, 1024, 256, WindowKind::Hann);
        assert_eq!(grid.n_bins(), 513);
        assert_eq!(
            grid.n_frames(),
            frame::frame_count(samples.len(), 1024, 256)
        );
        assert_eq!(grid.bin_freqs.len(), grid.n_bins());
    }

    #[test]
    fn sine_energy_concentrates_near_its_bin() {
        let sr = 22_050_u32;
        let freq = 441.0_f32;
        let samples = sine(freq, sr, 1.0);
        let grid = compute_grid(&samples, sr, 2048, 512, WindowKind::Hann);
        let mid = grid.n_frames() / 2;
        let mut best_bin = 0;
        let mut best = 0.0_f32;
        for bin in 0..grid.n_bins() {
            if grid.magnitude[[bin, mid]] > best {
                best = grid.magnitude[[bin, mid]];
                best_bin = bin;
            }
        }
        let expected = freq * 2048.0 / sr as f32;
        assert!((best_bin as f32 - expected).abs() <= 1.0);
    }

    #[test]
    fn db_grid_peaks_at_zero_and_respects_floor() {
        let samples = sine(440.0, 22_050, 0.25);
        let grid = compute_grid(&samples, 22_050, 1024, 256, WindowKind::Hann);
        let db = amplitude_to_db(&grid.magnitude, -80.0);
        let max = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let min = db.iter().copied().fold(f32::INFINITY, f32::min);
        assert!((max - 0.0).abs() < 1e-4);
        assert!(min >= -80.0);
    }

    #[test]
    fn silent_grid_floors_without_infinities() {
        let grid = Array2::<f32>::zeros((5, 4));
        let db = power_to_db(&grid, -80.0);
        assert!(db.iter().all(|&v| v == -80.0));
    }
}
