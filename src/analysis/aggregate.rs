use ndarray::Array2;

/// Mean along the time axis, one value per feature dimension.
pub(crate) fn time_mean(matrix: &Array2<f32>) -> Vec<f32> {
    let n_frames = matrix.ncols();
    if n_frames == 0 {
        return vec![0.0; matrix.nrows()];
    }
    matrix
        .rows()
        .into_iter()
        .map(|row| {
            let sum: f64 = row.iter().map(|&v| v as f64).sum();
            (sum / n_frames as f64) as f32
        })
        .collect()
}

pub(crate) fn mean_scalar(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    (sum / values.len() as f64) as f32
}
