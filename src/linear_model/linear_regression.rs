use std::fmt;
use std::path::Path;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::classify;
use crate::dataset::{DataGenerator, Dataset, apply_feature_map, with_bias};
use crate::linalg::{norm, pseudo_inverse};
use crate::metrics::classification_error;
use crate::preprocessing::FeatureMap;
use crate::target::{Interval, TargetFunction};
use crate::{LearnError, Matrix, Result, Vector};

/// Linear regression used as a classifier: `g(x) = sign(w·x)`.
///
/// The plain solution `w = (XᵗX)⁻¹Xᵗy` and the weight decay solution
/// `w_reg = (XᵗX + λI)⁻¹Xᵗy` are kept side by side so both can be scored.
#[derive(Clone)]
pub struct LinearRegression {
    pub weights: Vector,
    pub regularized_weights: Vector,
    training: Dataset,
    validation: Option<Dataset>,
    transform: Option<FeatureMap>,
    rng: StdRng,
}

impl LinearRegression {
    pub fn new(training: Dataset) -> Self {
        let n_features = training.n_features();
        Self {
            weights: Vector::zeros(n_features),
            regularized_weights: Vector::zeros(n_features),
            training,
            validation: None,
            transform: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.rng = StdRng::seed_from_u64(random_state);
        self
    }

    /// Held-out set scored by [`LinearRegression::validation_error`]. It goes
    /// through the same feature transformation as the training set.
    pub fn validation(mut self, mut validation: Dataset) -> Result<Self> {
        if validation.n_inputs() != self.training.n_inputs() {
            return Err(LearnError::dimension(
                self.training.n_inputs(),
                validation.n_inputs(),
            ));
        }
        if let Some(map) = &self.transform {
            validation.transform(map.as_ref())?;
        }
        self.validation = Some(validation);
        Ok(self)
    }

    pub fn training(&self) -> &Dataset {
        &self.training
    }

    pub fn validation_set(&self) -> Option<&Dataset> {
        self.validation.as_ref()
    }

    /// Replaces every feature vector `x` by `φ(x)` in the training and
    /// validation sets and resets both weight vectors to zeros of the new
    /// dimension. `φ` is also applied to every point scored later on.
    pub fn apply_transformation(&mut self, map: FeatureMap) -> Result<()> {
        self.training.transform(map.as_ref())?;
        if let Some(validation) = self.validation.as_mut() {
            validation.transform(map.as_ref())?;
        }

        let n_features = self.training.n_features();
        self.weights = Vector::zeros(n_features);
        self.regularized_weights = Vector::zeros(n_features);
        self.transform = Some(map);
        debug!("transformed training set to {} features", n_features);
        Ok(())
    }

    /// `w = (XᵗX)⁻¹ Xᵗ y`
    pub fn learn(&mut self) -> Result<&Vector> {
        self.weights = self.solve(0.0)?;
        debug!("linear regression weights: {}", self.weights);
        Ok(&self.weights)
    }

    /// `w_reg = (XᵗX + λI)⁻¹ Xᵗ y` with `λ = 10^k`.
    pub fn learn_with_weight_decay(&mut self, k: i32) -> Result<&Vector> {
        let lambda = 10f64.powi(k);
        self.regularized_weights = self.solve(lambda)?;
        debug!(
            "weight decay lambda = {}: weights {}, norm {:.4}",
            lambda,
            self.regularized_weights,
            norm(self.regularized_weights.view())
        );
        Ok(&self.regularized_weights)
    }

    fn solve(&self, lambda: f64) -> Result<Vector> {
        let x_dagger = pseudo_inverse(&self.training.features, lambda)?;
        Ok(x_dagger.dot(&self.training.labels))
    }

    /// `sign(x·w)` for rows already expressed in the model's feature space.
    pub fn predict(&self, features: &Matrix) -> Result<Vector> {
        classify(features, &self.weights)
    }

    pub fn predict_regularized(&self, features: &Matrix) -> Result<Vector> {
        classify(features, &self.regularized_weights)
    }

    /// Ein: fraction of misclassified training samples.
    pub fn in_sample_error(&self) -> Result<f64> {
        error_rate(&self.training.features, &self.training.labels, &self.weights)
    }

    /// Ein of the weight decay solution.
    pub fn augmented_in_sample_error(&self) -> Result<f64> {
        error_rate(
            &self.training.features,
            &self.training.labels,
            &self.regularized_weights,
        )
    }

    pub fn validation_error(&self) -> Result<f64> {
        let validation = self.require_validation()?;
        error_rate(&validation.features, &validation.labels, &self.weights)
    }

    pub fn augmented_validation_error(&self) -> Result<f64> {
        let validation = self.require_validation()?;
        error_rate(
            &validation.features,
            &validation.labels,
            &self.regularized_weights,
        )
    }

    fn require_validation(&self) -> Result<&Dataset> {
        self.validation
            .as_ref()
            .ok_or_else(|| LearnError::InvalidParameter("no validation set".to_string()))
    }

    /// Eout over `n_points` fresh samples of `generator`, noise included.
    pub fn out_of_sample_error(&mut self, generator: &DataGenerator, n_points: usize) -> Result<f64> {
        let sample = generator.sample(n_points, &mut self.rng)?;
        self.error_on(&sample)
    }

    pub fn augmented_out_of_sample_error(
        &mut self,
        generator: &DataGenerator,
        n_points: usize,
    ) -> Result<f64> {
        let sample = generator.sample(n_points, &mut self.rng)?;
        self.augmented_error_on(&sample)
    }

    /// Error on a held-out set given in raw inputs; the model's
    /// transformation is applied first.
    pub fn error_on(&self, data: &Dataset) -> Result<f64> {
        let features = self.features_for(&data.inputs)?;
        error_rate(&features, &data.labels, &self.weights)
    }

    pub fn augmented_error_on(&self, data: &Dataset) -> Result<f64> {
        let features = self.features_for(&data.inputs)?;
        error_rate(&features, &data.labels, &self.regularized_weights)
    }

    /// Eout measured on an `x1 x2 y` file.
    pub fn out_of_sample_error_from_file<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        self.error_on(&Dataset::from_file(path)?)
    }

    pub fn augmented_out_of_sample_error_from_file<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        self.augmented_error_on(&Dataset::from_file(path)?)
    }

    /// Disagreement between the hypothesis and `reference` on the training inputs.
    pub fn compare_in_sample(&self, reference: &TargetFunction) -> Result<f64> {
        let predictions = self.predict(&self.training.features)?;
        let expected = reference_labels(&self.training.inputs, reference)?;
        classification_error(&expected, &predictions)
    }

    /// Disagreement between the hypothesis and `reference` on `n_points`
    /// fresh points uniform in `interval²`.
    pub fn compare_out_of_sample(
        &mut self,
        reference: &TargetFunction,
        interval: &Interval,
        n_points: usize,
    ) -> Result<f64> {
        let inputs = Matrix::from_shape_simple_fn((n_points, 2), || interval.sample(&mut self.rng));
        let predictions = self.predict(&self.features_for(&inputs)?)?;
        let expected = reference_labels(&inputs, reference)?;
        classification_error(&expected, &predictions)
    }

    fn features_for(&self, inputs: &Matrix) -> Result<Matrix> {
        if inputs.ncols() != self.training.n_inputs() {
            return Err(LearnError::dimension(self.training.n_inputs(), inputs.ncols()));
        }

        let augmented = with_bias(inputs);
        match &self.transform {
            Some(map) => apply_feature_map(&augmented, map.as_ref()),
            None => Ok(augmented),
        }
    }
}

impl fmt::Debug for LinearRegression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearRegression")
            .field("weights", &self.weights)
            .field("regularized_weights", &self.regularized_weights)
            .field("n_samples", &self.training.n_samples())
            .field("has_validation", &self.validation.is_some())
            .field("transformed", &self.transform.is_some())
            .finish()
    }
}

fn error_rate(features: &Matrix, labels: &Vector, weights: &Vector) -> Result<f64> {
    let predictions = classify(features, weights)?;
    classification_error(labels, &predictions)
}

fn reference_labels(inputs: &Matrix, reference: &TargetFunction) -> Result<Vector> {
    if inputs.ncols() != 2 {
        return Err(LearnError::dimension(2, inputs.ncols()));
    }
    Ok(inputs
        .rows()
        .into_iter()
        .map(|point| reference.label(point[0], point[1]))
        .collect())
}
