//! Fixed-precision formatting of a [`FeatureBundle`] for tabular display.
//!
//! This is the last step before a rendering collaborator takes over: every
//! value is formatted to 4 decimal places and coefficient rows are numbered
//! from 1 for human display.

use std::fmt::Write as _;

use crate::analysis::FeatureBundle;

/// Fixed display precision for every aggregate value.
pub fn format_value(value: f32) -> String {
    format!("{value:.4}")
}

/// Representative pitch, or the explicit "undefined" marker.
pub fn pitch_label(pitch_hz: Option<f32>) -> String {
    match pitch_hz {
        Some(hz) => format!("{hz:.2} Hz"),
        None => "undefined".to_string(),
    }
}

/// 1-based display rows for an aggregate vector.
pub fn aggregate_rows(values: &[f32]) -> Vec<(usize, String)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i + 1, format_value(v)))
        .collect()
}

/// Plain-text report over the whole bundle.
pub fn render(bundle: &FeatureBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Signal");
    let _ = writeln!(
        out,
        "  duration: {} s  ({} frames @ {} Hz)",
        format_value(bundle.insight.duration_seconds),
        bundle.n_frames,
        bundle.sample_rate
    );
    let _ = writeln!(
        out,
        "  amplitude: mean {}  peak {}  rms {}",
        format_value(bundle.insight.mean_amplitude),
        format_value(bundle.insight.peak_amplitude),
        format_value(bundle.insight.rms_amplitude)
    );
    let _ = writeln!(out, "  pitch: {}", pitch_label(bundle.insight.pitch_hz));
    let _ = writeln!(
        out,
        "  zero-crossing rate: {}",
        format_value(bundle.zero_crossing_rate)
    );
    let _ = writeln!(out, "  roll-off: {} Hz", format_value(bundle.rolloff_hz));

    write_table(&mut out, "Spectral contrast (dB)", &bundle.contrast_db);
    write_table(&mut out, "MFCC", &bundle.mfcc.aggregate);
    write_table(&mut out, "Chroma", &bundle.chroma.aggregate);
    write_table(&mut out, "Tonnetz", &bundle.tonnetz.aggregate);
    out
}

fn write_table(out: &mut String, title: &str, values: &[f32]) {
    let _ = writeln!(out, "{title}");
    for (index, value) in aggregate_rows(values) {
        let _ = writeln!(out, "  {index:>3}  {value}");
    }
}
