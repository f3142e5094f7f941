use crate::linalg::dot;
use crate::{LearnError, Result, Vector};
use ndarray::ArrayView1;

/// `+1` for strictly positive values, `-1` otherwise.
pub fn sign(value: f64) -> f64 {
    if value > 0.0 { 1.0 } else { -1.0 }
}

/// Fraction of positions where the two label vectors disagree.
pub fn classification_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(LearnError::dimension(y_true.len(), y_pred.len()));
    }
    if y_true.is_empty() {
        return Err(LearnError::EmptyDataset);
    }

    let mismatches = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(actual, predicted)| actual != predicted)
        .count();

    Ok(mismatches as f64 / y_true.len() as f64)
}

/// `ln(1 + exp(-y * w·x))`
pub fn cross_entropy_error(x: ArrayView1<f64>, y: f64, weights: ArrayView1<f64>) -> Result<f64> {
    let margin = y * dot(x, weights)?;
    Ok((-margin).exp().ln_1p())
}

/// Expected in-sample error of linear regression on noisy targets,
/// `σ² (1 - (d + 1) / N)`.
pub fn expected_in_sample_error(n_samples: usize, sigma: f64, dimension: usize) -> f64 {
    sigma * sigma * (1.0 - (dimension + 1) as f64 / n_samples as f64)
}
