//! Sliding window construction over time-ordered feature rows.
//!
//! The only stage where sequence order matters: earlier stages are
//! row-independent, so no shuffling happens anywhere. Each sample's label
//! is taken from the row immediately past its window, a strictly
//! forward-looking target.

use ndarray::{Array1, Array2, Array3};

use crate::error::FedsimError;

/// Builds `N - window` samples from an `N x k` feature matrix.
///
/// Sample `i` covers feature rows `[i, i + window)`; its label is
/// `labels[i + window]`. Returns `InsufficientData` when `N <= window`.
pub fn build(
    features: &Array2<f64>,
    labels: &[f64],
    window: usize,
) -> Result<(Array3<f64>, Array1<f64>), FedsimError> {
    if window == 0 {
        return Err(FedsimError::Parse("window size must be at least 1".to_string()));
    }

    let n = features.nrows();
    if n <= window {
        return Err(FedsimError::InsufficientData { rows: n, window });
    }
    if labels.len() != n {
        return Err(FedsimError::Parse(format!(
            "label vector length {} does not match {} feature rows",
            labels.len(),
            n
        )));
    }

    let k = features.ncols();
    let samples = n - window;

    let mut x = Array3::zeros((samples, window, k));
    let mut y = Array1::zeros(samples);

    for i in 0..samples {
        for j in 0..window {
            for l in 0..k {
                x[[i, j, l]] = features[[i + j, l]];
            }
        }
        y[i] = labels[i + window];
    }

    Ok((x, y))
}
