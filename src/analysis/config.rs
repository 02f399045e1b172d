use serde::{Deserialize, Serialize};

use super::error::AnalysisError;

/// Window applied to each frame before the spectral transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    Hann,
    Hamming,
    Rectangular,
}

/// Tunables for one analysis pass. `Default` matches the reporting defaults
/// used throughout: 2048-sample frames with 4x overlap, 128 mel filters,
/// 13 cepstral coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub frame_size: usize,
    pub hop_size: usize,
    pub window: WindowKind,
    pub n_mfcc: usize,
    pub n_mel_filters: usize,
    pub rolloff_fraction: f32,
    pub contrast_bands: usize,
    pub contrast_quantile: f32,
    /// Absolute spectral magnitude below which a frame counts as unvoiced.
    pub pitch_min_magnitude: f32,
    /// Lower bound for log-magnitude grids, in dB relative to the grid peak.
    pub db_floor: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            window: WindowKind::Hann,
            n_mfcc: 13,
            n_mel_filters: 128,
            rolloff_fraction: 0.85,
            contrast_bands: 6,
            contrast_quantile: 0.02,
            pitch_min_magnitude: 1e-2,
            db_floor: -80.0,
        }
    }
}

impl AnalysisConfig {
    /// Reject out-of-range parameters before any computation starts.
    pub(crate) fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size == 0 {
            return Err(AnalysisError::invalid("frame_size", "must be positive"));
        }
        if !self.frame_size.is_power_of_two() {
            return Err(AnalysisError::invalid(
                "frame_size",
                format!("must be a power of two, got {}", self.frame_size),
            ));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::invalid("hop_size", "must be positive"));
        }
        if self.hop_size > self.frame_size {
            return Err(AnalysisError::invalid(
                "hop_size",
                format!(
                    "must not exceed frame_size ({} > {})",
                    self.hop_size, self.frame_size
                ),
            ));
        }
        if self.n_mel_filters == 0 {
            return Err(AnalysisError::invalid("n_mel_filters", "must be positive"));
        }
        if self.n_mfcc == 0 || self.n_mfcc > self.n_mel_filters {
            return Err(AnalysisError::invalid(
                "n_mfcc",
                format!(
                    "must be in 1..={}, got {}",
                    self.n_mel_filters, self.n_mfcc
                ),
            ));
        }
        if !self.rolloff_fraction.is_finite()
            || self.rolloff_fraction <= 0.0
            || self.rolloff_fraction > 1.0
        {
            return Err(AnalysisError::invalid(
                "rolloff_fraction",
                format!("must be in (0, 1], got {}", self.rolloff_fraction),
            ));
        }
        if self.contrast_bands == 0 {
            return Err(AnalysisError::invalid("contrast_bands", "must be positive"));
        }
        if !self.contrast_quantile.is_finite()
            || self.contrast_quantile <= 0.0
            || self.contrast_quantile > 0.5
        {
            return Err(AnalysisError::invalid(
                "contrast_quantile",
                format!("must be in (0, 0.5], got {}", self.contrast_quantile),
            ));
        }
        if !self.pitch_min_magnitude.is_finite() || self.pitch_min_magnitude < 0.0 {
            return Err(AnalysisError::invalid(
                "pitch_min_magnitude",
                format!("must be non-negative, got {}", self.pitch_min_magnitude),
            ));
        }
        if !self.db_floor.is_finite() || self.db_floor >= 0.0 {
            return Err(AnalysisError::invalid(
                "db_floor",
                format!("must be negative, got {}", self.db_floor),
            ));
        }
        Ok(())
    }
}
