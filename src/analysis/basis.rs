//! Precomputed projection bases: mel filter bank, chroma bin mapping, and the
//! tonnetz transformation. Pure data, memoized per (sample_rate, frame_size,
//! n_mel_filters) and never invalidated within the process.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex, OnceLock};

/// Reference frequency of pitch class 0 (C0), placing A at class 9.
const C_REF_HZ: f32 = 16.351_598;

/// Sparse triangular filter: `(bin, weight)` pairs with non-zero weight.
pub(crate) type MelFilter = Vec<(usize, f32)>;

pub(crate) struct BasisSet {
    pub(crate) mel_filters: Vec<MelFilter>,
    /// Pitch class per spectral bin; `None` for the DC bin.
    pub(crate) chroma_classes: Vec<Option<usize>>,
    /// Fixed 6x12 projection from pitch-class space onto the circles of
    /// fifths, minor thirds, and major thirds.
    pub(crate) tonnetz: [[f32; 12]; 6],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BasisKey {
    sample_rate: u32,
    frame_size: usize,
    n_mel_filters: usize,
}

static CACHE: OnceLock<Mutex<HashMap<BasisKey, Arc<BasisSet>>>> = OnceLock::new();

pub(crate) fn basis_for(sample_rate: u32, frame_size: usize, n_mel_filters: usize) -> Arc<BasisSet> {
    let key = BasisKey {
        sample_rate,
        frame_size,
        n_mel_filters,
    };
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(guard.entry(key).or_insert_with(|| {
        Arc::new(BasisSet {
            mel_filters: build_mel_filters(sample_rate, frame_size, n_mel_filters),
            chroma_classes: build_chroma_classes(sample_rate, frame_size),
            tonnetz: build_tonnetz_basis(),
        })
    }))
}

pub(crate) fn hz_to_mel(hz: f32) -> f32 {
    2595.0_f32 * (1.0 + hz / 700.0).log10()
}

pub(crate) fn mel_to_hz(mel: f32) -> f32 {
    700.0_f32 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular filters spaced evenly on the mel scale from 0 Hz to Nyquist,
/// evaluated in Hz against the spectral bin centers.
fn build_mel_filters(sample_rate: u32, frame_size: usize, n_mel_filters: usize) -> Vec<MelFilter> {
    let n_bins = frame_size / 2 + 1;
    let sr = sample_rate.max(1) as f32;
    let nyquist = sr * 0.5;
    let mel_max = hz_to_mel(nyquist);

    let hz_points: Vec<f32> = (0..n_mel_filters + 2)
        .map(|i| mel_to_hz(mel_max * i as f32 / (n_mel_filters + 1) as f32))
        .collect();

    let mut filters = Vec::with_capacity(n_mel_filters);
    for m in 0..n_mel_filters {
        let (left, center, right) = (hz_points[m], hz_points[m + 1], hz_points[m + 2]);
        let mut filter = MelFilter::new();
        if center > left && right > center {
            for bin in 0..n_bins {
                let freq = bin as f32 * sr / frame_size as f32;
                let rising = (freq - left) / (center - left);
                let falling = (right - freq) / (right - center);
                let weight = rising.min(falling);
                if weight > 0.0 {
                    filter.push((bin, weight));
                }
            }
        }
        filters.push(filter);
    }
    filters
}

/// Octave-folded pitch class for every spectral bin:
/// `round(12 * log2(f / C_REF)) mod 12`.
fn build_chroma_classes(sample_rate: u32, frame_size: usize) -> Vec<Option<usize>> {
    let n_bins = frame_size / 2 + 1;
    let sr = sample_rate.max(1) as f32;
    (0..n_bins)
        .map(|bin| {
            let freq = bin as f32 * sr / frame_size as f32;
            if freq <= 0.0 {
                return None;
            }
            let class = (12.0 * (freq / C_REF_HZ).log2()).round() as i64;
            Some(class.rem_euclid(12) as usize)
        })
        .collect()
}

/// Sin/cos pairs on the circle of fifths (interval 7, radius 1), minor
/// thirds (interval 3, radius 1), and major thirds (interval 4, radius 0.5).
fn build_tonnetz_basis() -> [[f32; 12]; 6] {
    let circles: [(f32, f32); 3] = [(7.0, 1.0), (3.0, 1.0), (4.0, 0.5)];
    let mut basis = [[0.0_f32; 12]; 6];
    for (pair, &(interval, radius)) in circles.iter().enumerate() {
        for class in 0..12 {
            let angle = 2.0 * PI * interval * class as f32 / 12.0;
            basis[2 * pair][class] = radius * angle.sin();
            basis[2 * pair + 1][class] = radius * angle.cos();
        }
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mel_scale_round_trips() {
        for hz in [0.0_f32, 100.0, 440.0, 8_000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 0.5);
        }
    }

    #[test]
    fn mel_filters_cover_requested_count() {
        let filters = build_mel_filters(22_050, 2048, 128);
        assert_eq!(filters.len(), 128);
        let populated = filters.iter().filter(|f| !f.is_empty()).count();
        assert!(populated > 120, "only {populated} filters carry weight");
    }

    #[test]
    fn a440_bin_maps_to_class_nine() {
        let classes = build_chroma_classes(44_100, 2048);
        let bin = (440.0_f32 * 2048.0 / 44_100.0).round() as usize;
        assert_eq!(classes[bin], Some(9));
    }

    #[test]
    fn dc_bin_has_no_pitch_class() {
        let classes = build_chroma_classes(44_100, 2048);
        assert_eq!(classes[0], None);
    }

    #[test]
    fn tonnetz_rows_have_expected_radii() {
        let basis = build_tonnetz_basis();
        for class in 0..12 {
            let fifth = (basis[0][class].powi(2) + basis[1][class].powi(2)).sqrt();
            let major = (basis[4][class].powi(2) + basis[5][class].powi(2)).sqrt();
            assert!((fifth - 1.0).abs() < 1e-5);
            assert!((major - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn cache_returns_shared_instances() {
        let a = basis_for(48_000, 1024, 64);
        let b = basis_for(48_000, 1024, 64);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
