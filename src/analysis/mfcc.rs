use ndarray::Array2;

use std::f64::consts::PI;

/// Guard against `log(0)` on silent mel rows.
const LOG_EPSILON: f64 = 1e-10;

/// Mel-frequency cepstral coefficients from a power-domain mel grid.
///
/// Log-compresses each mel column, applies a Type-II DCT along the filter
/// axis, and keeps the first `n_mfcc` coefficients per frame.
pub(crate) fn mfcc_matrix(mel_power: &Array2<f32>, n_mfcc: usize) -> Array2<f32> {
    let n_filters = mel_power.nrows();
    let n_frames = mel_power.ncols();
    let mut mfcc = Array2::<f32>::zeros((n_mfcc, n_frames));
    if n_filters == 0 {
        return mfcc;
    }

    let mut log_energies = vec![0.0_f64; n_filters];
    for frame in 0..n_frames {
        for (m, value) in log_energies.iter_mut().enumerate() {
            *value = (mel_power[[m, frame]].max(0.0) as f64 + LOG_EPSILON).ln();
        }
        for k in 0..n_mfcc {
            let mut sum = 0.0_f64;
            for (m, &log_energy) in log_energies.iter().enumerate() {
                let angle = PI * k as f64 * (m as f64 + 0.5) / n_filters as f64;
                sum += log_energy * angle.cos();
            }
            mfcc[[k, frame]] = sum as f32;
        }
    }
    mfcc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_keeps_requested_coefficient_count() {
        let mel = Array2::<f32>::from_elem((40, 7), 0.5);
        let mfcc = mfcc_matrix(&mel, 13);
        assert_eq!(mfcc.nrows(), 13);
        assert_eq!(mfcc.ncols(), 7);
    }

    #[test]
    fn silence_yields_finite_coefficients() {
        let mel = Array2::<f32>::zeros((40, 3));
        let mfcc = mfcc_matrix(&mel, 13);
        assert!(mfcc.iter().all(|v| v.is_finite()));
        // Constant log-energy collapses onto the DC coefficient.
        for frame in 0..3 {
            for k in 1..13 {
                assert!(mfcc[[k, frame]].abs() < 1e-3);
            }
        }
    }

    #[test]
    fn first_coefficient_tracks_overall_energy() {
        let quiet = Array2::<f32>::from_elem((20, 1), 1e-6);
        let loud = Array2::<f32>::from_elem((20, 1), 1.0);
        let quiet_c0 = mfcc_matrix(&quiet, 5)[[0, 0]];
        let loud_c0 = mfcc_matrix(&loud, 5)[[0, 0]];
        assert!(loud_c0 > quiet_c0);
    }
}
