use ndarray::Array2;

use super::basis::BasisSet;
use super::stft::SpectralGrid;

/// Fold spectral energy into the 12 pitch classes, one column per frame.
///
/// Each frame with any energy is normalized to unit sum so class strengths
/// compare across frames; zero-energy frames stay all-zero.
pub(crate) fn chroma_matrix(grid: &SpectralGrid, basis: &BasisSet) -> Array2<f32> {
    let n_frames = grid.n_frames();
    let mut chroma = Array2::<f32>::zeros((12, n_frames));
    for frame in 0..n_frames {
        let mut classes = [0.0_f64; 12];
        for bin in 0..grid.n_bins() {
            if let Some(class) = basis.chroma_classes[bin] {
                classes[class] += grid.power[[bin, frame]].max(0.0) as f64;
            }
        }
        let total: f64 = classes.iter().sum();
        if total > 0.0 {
            for (class, &energy) in classes.iter().enumerate() {
                chroma[[class, frame]] = (energy / total) as f32;
            }
        }
    }
    chroma
}

/// Project per-frame chroma onto the fixed 6x12 tonnetz basis.
pub(crate) fn tonnetz_matrix(chroma: &Array2<f32>, basis: &BasisSet) -> Array2<f32> {
    let n_frames = chroma.ncols();
    let mut tonnetz = Array2::<f32>::zeros((6, n_frames));
    for frame in 0..n_frames {
        for (dim, row) in basis.tonnetz.iter().enumerate() {
            let mut sum = 0.0_f64;
            for (class, &weight) in row.iter().enumerate() {
                sum += weight as f64 * chroma[[class, frame]] as f64;
            }
            tonnetz[[dim, frame]] = sum as f32;
        }
    }
    tonnetz
}
