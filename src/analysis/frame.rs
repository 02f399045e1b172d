use std::f32::consts::PI;

use super::config::WindowKind;

/// Number of analysis frames for a signal of `len` samples.
///
/// A signal shorter than one frame still yields a single zero-padded frame;
/// otherwise the count follows `ceil((len - frame_size) / hop) + 1`, with the
/// trailing partial frame zero-padded rather than dropped.
pub(crate) fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if len <= frame_size {
        return 1;
    }
    (len - frame_size).div_ceil(hop_size) + 1
}

pub(crate) fn build_window(kind: WindowKind, length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = (length - 1) as f32;
    match kind {
        WindowKind::Hann => (0..length)
            .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
            .collect(),
        WindowKind::Hamming => (0..length)
            .map(|n| 0.54_f32 - 0.46 * (2.0 * PI * n as f32 / denom).cos())
            .collect(),
        WindowKind::Rectangular => vec![1.0_f32; length],
    }
}

/// Copy the frame starting at `start` into `dst`, zero-padding past the end
/// of the signal. Non-finite samples are silenced.
pub(crate) fn fill_raw(dst: &mut [f32], samples: &[f32], start: usize) {
    for (i, cell) in dst.iter_mut().enumerate() {
        *cell = sanitize(samples.get(start + i).copied().unwrap_or(0.0));
    }
}

/// Like [`fill_raw`] but with the analysis window applied.
pub(crate) fn fill_windowed(dst: &mut [f32], samples: &[f32], start: usize, window: &[f32]) {
    for (i, cell) in dst.iter_mut().enumerate() {
        let src = sanitize(samples.get(start + i).copied().unwrap_or(0.0));
        let win = window.get(i).copied().unwrap_or(1.0);
        *cell = src * win;
    }
}

pub(crate) fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}
