use super::frame;

/// Whole-signal scalar summaries, computed straight from the sample buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SignalStats {
    pub(crate) duration_seconds: f32,
    pub(crate) mean_amplitude: f32,
    pub(crate) peak_amplitude: f32,
    pub(crate) rms_amplitude: f32,
}

pub(crate) fn signal_stats(samples: &[f32], sample_rate: u32) -> SignalStats {
    let mut abs_sum = 0.0_f64;
    let mut square_sum = 0.0_f64;
    let mut peak = 0.0_f32;
    for &sample in samples {
        let value = frame::sanitize(sample);
        abs_sum += value.abs() as f64;
        square_sum += (value as f64) * (value as f64);
        peak = peak.max(value.abs());
    }
    let count = samples.len().max(1) as f64;
    SignalStats {
        duration_seconds: samples.len() as f32 / sample_rate.max(1) as f32,
        mean_amplitude: (abs_sum / count) as f32,
        peak_amplitude: peak,
        rms_amplitude: (square_sum / count).sqrt() as f32,
    }
}

/// Zero-crossing rate per unwindowed frame: sign changes between consecutive
/// samples divided by frame length. A zero-to-zero step is not a crossing.
pub(crate) fn zero_crossing_rates(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
    n_frames: usize,
) -> Vec<f32> {
    let mut rates = Vec::with_capacity(n_frames);
    let mut buffer = vec![0.0_f32; frame_size];
    for frame_idx in 0..n_frames {
        frame::fill_raw(&mut buffer, samples, frame_idx * hop_size);
        let mut crossings = 0u32;
        let mut prev = buffer[0];
        for &current in &buffer[1..] {
            let crossed = (prev >= 0.0 && current < 0.0) || (prev < 0.0 && current >= 0.0);
            if crossed && (prev != 0.0 || current != 0.0) {
                crossings += 1;
            }
            prev = current;
        }
        rates.push(crossings as f32 / frame_size as f32);
    }
    rates
}
