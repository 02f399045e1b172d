//! Audio feature extraction: one mono buffer in, one feature bundle out.
//!
//! [`analyze`] runs the whole pipeline (framing, STFT, filterbank
//! projections, cepstral coefficients, per-frame statistics, pitch tracking)
//! as a pure synchronous function. The only state shared between calls is
//! the read-only, lazily built projection basis cache.

mod aggregate;
mod basis;
mod chroma;
mod config;
mod error;
mod frame;
mod mel;
mod mfcc;
mod pitch;
mod spectral_stats;
mod stft;
mod time_domain;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use config::{AnalysisConfig, WindowKind};
pub use error::AnalysisError;

/// A per-frame feature matrix together with its time-axis mean.
///
/// Matrices are `(feature_dim, n_frames)`; the aggregate has one entry per
/// feature dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub matrix: Array2<f32>,
    pub aggregate: Vec<f32>,
}

impl FeatureSet {
    fn from_matrix(matrix: Array2<f32>) -> Self {
        let aggregate = aggregate::time_mean(&matrix);
        Self { matrix, aggregate }
    }
}

/// Waveform-level scalar summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub duration_seconds: f32,
    pub mean_amplitude: f32,
    pub peak_amplitude: f32,
    pub rms_amplitude: f32,
    /// Representative pitch in Hz; `None` when no frame was voiced.
    pub pitch_hz: Option<f32>,
}

/// Everything one analysis pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    pub sample_rate: u32,
    pub frame_size: usize,
    pub hop_size: usize,
    pub n_frames: usize,
    pub insight: Insight,
    /// STFT log-magnitude in dB relative to the grid peak.
    pub stft_db: FeatureSet,
    /// Mel-spectrogram in dB relative to the grid peak.
    pub mel_db: FeatureSet,
    /// 12 pitch classes, unit-sum per voiced frame.
    pub chroma: FeatureSet,
    /// 6-dimensional tonal centroid projection of the chroma.
    pub tonnetz: FeatureSet,
    /// First `n_mfcc` cepstral coefficients per frame.
    pub mfcc: FeatureSet,
    /// Mean fraction of sign changes per sample within a frame.
    pub zero_crossing_rate: f32,
    /// Mean roll-off frequency in Hz.
    pub rolloff_hz: f32,
    /// Mean peak-to-valley contrast in dB, residual band first.
    pub contrast_db: Vec<f32>,
}

/// Analyze one mono signal at a fixed sample rate.
///
/// Fatal errors (`InvalidConfig`, `EmptySignal`) surface before any feature
/// is computed; an undetectable pitch degrades `Insight::pitch_hz` to `None`
/// while everything else computes normally.
pub fn analyze(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<FeatureBundle, AnalysisError> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(AnalysisError::invalid("sample_rate", "must be positive"));
    }
    if samples.is_empty() {
        return Err(AnalysisError::EmptySignal);
    }

    tracing::debug!(
        samples = samples.len(),
        sample_rate,
        frame_size = config.frame_size,
        hop_size = config.hop_size,
        "starting analysis pass"
    );

    let basis = basis::basis_for(sample_rate, config.frame_size, config.n_mel_filters);
    let grid = stft::compute_grid_with(samples, sample_rate, config);
    let n_frames = grid.n_frames();

    let stft_db = stft::amplitude_to_db(&grid.magnitude, config.db_floor);
    let mel_power = mel::mel_power_matrix(&grid, &basis);
    let mel_db = stft::power_to_db(&mel_power, config.db_floor);
    let chroma = chroma::chroma_matrix(&grid, &basis);
    let tonnetz = chroma::tonnetz_matrix(&chroma, &basis);
    let mfcc = mfcc::mfcc_matrix(&mel_power, config.n_mfcc);

    let zcr_frames = time_domain::zero_crossing_rates(
        samples,
        config.frame_size,
        config.hop_size,
        n_frames,
    );
    let rolloff_frames = spectral_stats::rolloff_hz(&grid, config.rolloff_fraction);
    let contrast = spectral_stats::contrast_matrix(
        &grid,
        config.contrast_bands,
        config.contrast_quantile,
    );
    let pitches = pitch::frame_pitches(&grid, config.pitch_min_magnitude);
    let pitch_hz = pitch::representative_pitch(&pitches);
    if pitch_hz.is_none() {
        tracing::debug!("no voiced frame above threshold; pitch is undefined");
    }

    let stats = time_domain::signal_stats(samples, sample_rate);

    Ok(FeatureBundle {
        sample_rate,
        frame_size: config.frame_size,
        hop_size: config.hop_size,
        n_frames,
        insight: Insight {
            duration_seconds: stats.duration_seconds,
            mean_amplitude: stats.mean_amplitude,
            peak_amplitude: stats.peak_amplitude,
            rms_amplitude: stats.rms_amplitude,
            pitch_hz,
        },
        stft_db: FeatureSet::from_matrix(stft_db),
        mel_db: FeatureSet::from_matrix(mel_db),
        chroma: FeatureSet::from_matrix(chroma),
        tonnetz: FeatureSet::from_matrix(tonnetz),
        mfcc: FeatureSet::from_matrix(mfcc),
        zero_crossing_rate: aggregate::mean_scalar(&zcr_frames),
        rolloff_hz: aggregate::mean_scalar(&rolloff_frames),
        contrast_db: aggregate::time_mean(&contrast),
    })
}
