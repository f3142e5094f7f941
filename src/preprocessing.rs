//! Feature transformations applied to a bias-augmented point `(1, x1, x2)`.

use std::sync::Arc;

use ndarray::{ArrayView1, array};

use crate::{LearnError, Result, Vector};

/// Caller supplied mapping `(1, x...) -> features`.
pub type FeatureMap = Arc<dyn Fn(ArrayView1<f64>) -> Vector + Send + Sync>;

pub fn feature_map<F>(f: F) -> FeatureMap
where
    F: Fn(ArrayView1<f64>) -> Vector + Send + Sync + 'static,
{
    Arc::new(f)
}

/// `(1, x1, x2, x1·x2, x1², x2²)`
pub fn quadratic() -> FeatureMap {
    feature_map(|x| {
        let (x1, x2) = (x[1], x[2]);
        array![1.0, x1, x2, x1 * x2, x1 * x1, x2 * x2]
    })
}

/// The first `k + 1` entries of
/// `(1, x1, x2, x1², x2², x1·x2, |x1 - x2|, |x1 + x2|)`, `k` in `0..=7`.
pub fn nonlinear(k: usize) -> Result<FeatureMap> {
    if k > 7 {
        return Err(LearnError::InvalidParameter(format!(
            "nonlinear transform order must be within 0..=7, got {}",
            k
        )));
    }

    Ok(feature_map(move |x| {
        let (x1, x2) = (x[1], x[2]);
        let full = [
            1.0,
            x1,
            x2,
            x1 * x1,
            x2 * x2,
            x1 * x2,
            (x1 - x2).abs(),
            (x1 + x2).abs(),
        ];
        Vector::from(full[..=k].to_vec())
    }))
}
