use ndarray::Array2;

use super::basis::BasisSet;
use super::stft::SpectralGrid;

/// Project the power grid onto the mel filter bank.
///
/// Output stays in the power domain, shape `(n_mel_filters, n_frames)`; the
/// cepstral stage consumes it directly and the reported matrix is the dB view.
pub(crate) fn mel_power_matrix(grid: &SpectralGrid, basis: &BasisSet) -> Array2<f32> {
    let n_frames = grid.n_frames();
    let mut mel = Array2::<f32>::zeros((basis.mel_filters.len(), n_frames));
    for (row, filter) in basis.mel_filters.iter().enumerate() {
        for frame in 0..n_frames {
            let mut sum = 0.0_f64;
            for &(bin, weight) in filter {
                sum += grid.power[[bin, frame]].max(0.0) as f64 * weight as f64;
            }
            mel[[row, frame]] = sum as f32;
        }
    }
    mel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::basis;
    use crate::analysis::config::WindowKind;
    use crate::analysis::stft;
    use std::f32::consts::PI;

    #[test]
    fn mel_matrix_has_filter_rows_and_grid_columns() {
        let sr = 22_050_u32;
        let samples: Vec<f32> = (0..sr as usize / 4)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sr as f32).sin())
            .collect();
        let grid = stft::compute_grid(&samples, sr, 1024, 256, WindowKind::Hann);
        let basis = basis::basis_for(sr, 1024, 40);
        let mel = mel_power_matrix(&grid, &basis);
        assert_eq!(mel.nrows(), 40);
        assert_eq!(mel.ncols(), grid.n_frames());
    }

    #[test]
    fn low_tone_concentrates_in_low_filters() {
        let sr = 22_050_u32;
        let samples: Vec<f32> = (0..sr as usize / 2)
            .map(|i| (2.0 * PI * 110.0 * i as f32 / sr as f32).sin())
            .collect();
        let grid = stft::compute_grid(&samples, sr, 2048, 512, WindowKind::Hann);
        let basis = basis::basis_for(sr, 2048, 64);
        let mel = mel_power_matrix(&grid, &basis);
        let mid = mel.ncols() / 2;
        let mut best_row = 0;
        let mut best = 0.0_f32;
        for row in 0..mel.nrows() {
            if mel[[row, mid]] > best {
                best = mel[[row, mid]];
                best_row = row;
            }
        }
        assert!(best_row < 16, "110 Hz landed in filter {best_row}");
    }

    #[test]
    fn silence_projects_to_zero_energy() {
        let samples = vec![0.0_f32; 4096];
        let grid = stft::compute_grid(&samples, 16_000, 1024, 512, WindowKind::Hann);
        let basis = basis::basis_for(16_000, 1024, 32);
        let mel = mel_power_matrix(&grid, &basis);
        assert!(mel.iter().all(|&v| v == 0.0));
    }
}
