use log::{debug, trace};
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::classify;
use crate::dataset::{DataGenerator, Dataset, with_bias};
use crate::linalg::dot;
use crate::metrics::{classification_error, sign};
use crate::{LearnError, Matrix, Result, Vector};

/// Weight updates allowed by [`Perceptron::converge`] unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

#[derive(Clone, Debug)]
pub struct Perceptron {
    pub weights: Vector,
    training: Dataset,
    max_iterations: Option<usize>,
    rng: StdRng,
}

impl Perceptron {
    /// Zero weights, at most [`DEFAULT_MAX_ITERATIONS`] updates.
    pub fn new(training: Dataset) -> Self {
        Self {
            weights: Vector::zeros(training.n_features()),
            training,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            rng: StdRng::from_entropy(),
        }
    }

    /// Fails [`Perceptron::converge`] with `NonConvergence` after `max_iterations` updates.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Removes the iteration cap. [`Perceptron::converge`] then only returns
    /// on linearly separable data.
    pub fn unbounded(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.rng = StdRng::seed_from_u64(random_state);
        self
    }

    pub fn training(&self) -> &Dataset {
        &self.training
    }

    /// `h(x) = sign(w·x)`
    pub fn hypothesis(&self, x: ArrayView1<f64>) -> Result<f64> {
        Ok(sign(dot(x, self.weights.view())?))
    }

    pub fn predict(&self, features: &Matrix) -> Result<Vector> {
        classify(features, &self.weights)
    }

    /// Indexes of the training samples the current weights get wrong.
    pub fn misclassified(&self) -> Result<Vec<usize>> {
        let predictions = self.predict(&self.training.features)?;
        Ok(predictions
            .iter()
            .zip(self.training.labels.iter())
            .enumerate()
            .filter(|(_, (predicted, actual))| predicted != actual)
            .map(|(i, _)| i)
            .collect())
    }

    /// Runs PLA until no training sample is misclassified, correcting on a
    /// misclassified sample picked uniformly at random at every step.
    ///
    /// Returns the number of weight updates, or `NonConvergence` once the
    /// iteration cap is reached.
    pub fn converge(&mut self) -> Result<usize> {
        let mut iterations = 0;

        loop {
            let misclassified = self.misclassified()?;
            if misclassified.is_empty() {
                debug!(
                    "perceptron converged after {} iterations, weights: {}",
                    iterations, self.weights
                );
                return Ok(iterations);
            }

            if let Some(limit) = self.max_iterations {
                if iterations >= limit {
                    return Err(LearnError::NonConvergence { limit });
                }
            }

            let index = misclassified[self.rng.gen_range(0..misclassified.len())];
            self.update_weights(index)?;
            iterations += 1;
            trace!(
                "iteration {}: corrected sample {}, {} misclassified before update",
                iterations,
                index,
                misclassified.len()
            );
        }
    }

    /// `w <- w + y_n x_n`
    fn update_weights(&mut self, index: usize) -> Result<()> {
        let x = self.training.features.row(index);
        if x.len() != self.weights.len() {
            return Err(LearnError::dimension(self.weights.len(), x.len()));
        }
        self.weights.scaled_add(self.training.labels[index], &x);
        Ok(())
    }

    /// Fraction of `n_points` fresh points on which the hypothesis and the
    /// generator's target function disagree.
    pub fn disagreement(&mut self, generator: &DataGenerator, n_points: usize) -> Result<f64> {
        if n_points == 0 {
            return Err(LearnError::EmptyDataset);
        }

        let inputs = generator.sample_inputs(n_points, &mut self.rng);
        let targets = inputs
            .rows()
            .into_iter()
            .map(|point| generator.target().label(point[0], point[1]))
            .collect::<Vector>();
        let predictions = self.predict(&with_bias(&inputs))?;

        classification_error(&targets, &predictions)
    }
}
