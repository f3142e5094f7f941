use log::{debug, trace};
use ndarray::ArrayView1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::classify;
use crate::dataset::{DataGenerator, Dataset, with_bias};
use crate::linalg::{dot, norm};
use crate::metrics::cross_entropy_error;
use crate::{LearnError, Matrix, Result, Vector};

/// Epochs allowed by [`LogisticRegression::learn`] unless configured otherwise.
pub const DEFAULT_MAX_EPOCHS: usize = 100_000;

#[derive(Clone, Debug)]
pub struct LogisticRegression {
    pub weights: Vector,
    pub epochs: usize,
    training: Dataset,
    learning_rate: f64,
    tolerance: f64,
    max_epochs: Option<usize>,
    rng: StdRng,
}

impl LogisticRegression {
    /// Zero weights, learning rate 0.01, tolerance 0.01, at most
    /// [`DEFAULT_MAX_EPOCHS`] epochs.
    pub fn new(training: Dataset) -> Self {
        Self {
            weights: Vector::zeros(training.n_features()),
            epochs: 0,
            training,
            learning_rate: 0.01,
            tolerance: 0.01,
            max_epochs: Some(DEFAULT_MAX_EPOCHS),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Training stops once an epoch moves the weights by less than `tolerance`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = Some(max_epochs);
        self
    }

    /// Removes the epoch cap; training runs until the tolerance is met.
    pub fn unbounded(mut self) -> Self {
        self.max_epochs = None;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.rng = StdRng::seed_from_u64(random_state);
        self
    }

    pub fn training(&self) -> &Dataset {
        &self.training
    }

    /// Stochastic gradient descent on the cross-entropy error.
    ///
    /// Each epoch visits the training samples in a fresh random order and
    /// updates the weights after every sample. Returns the number of epochs
    /// run until `‖w_epoch_end - w_epoch_start‖ < tolerance`.
    pub fn learn(&mut self) -> Result<usize> {
        let mut indexes: Vec<usize> = (0..self.training.n_samples()).collect();
        self.epochs = 0;

        loop {
            indexes.shuffle(&mut self.rng);
            let previous = self.weights.clone();

            for &i in &indexes {
                let gradient =
                    self.gradient(self.training.features.row(i), self.training.labels[i])?;
                self.update_weights(&gradient)?;
            }
            self.epochs += 1;

            let step = norm((&self.weights - &previous).view());
            trace!("epoch {}: weight step {:.6}", self.epochs, step);
            if step < self.tolerance {
                debug!(
                    "logistic regression converged after {} epochs, weights: {}",
                    self.epochs, self.weights
                );
                return Ok(self.epochs);
            }

            if let Some(limit) = self.max_epochs {
                if self.epochs >= limit {
                    return Err(LearnError::NonConvergence { limit });
                }
            }
        }
    }

    /// Gradient of `ln(1 + exp(-y w·x))` at the current weights:
    /// `-y x / (1 + exp(y w·x))`.
    pub fn gradient(&self, x: ArrayView1<f64>, y: f64) -> Result<Vector> {
        let denominator = 1.0 + (y * dot(x, self.weights.view())?).exp();
        Ok(x.mapv(|xi| -y * xi / denominator))
    }

    /// `w <- w - η ∇`
    pub fn update_weights(&mut self, gradient: &Vector) -> Result<()> {
        if gradient.len() != self.weights.len() {
            return Err(LearnError::dimension(self.weights.len(), gradient.len()));
        }
        self.weights.scaled_add(-self.learning_rate, gradient);
        Ok(())
    }

    pub fn cross_entropy_error(&self, x: ArrayView1<f64>, y: f64) -> Result<f64> {
        cross_entropy_error(x, y, self.weights.view())
    }

    /// Average cross-entropy error over the training set.
    pub fn in_sample_error(&self) -> Result<f64> {
        self.mean_cross_entropy(&self.training.features, &self.training.labels)
    }

    /// Average cross-entropy error over `n_points` fresh samples of `generator`.
    pub fn out_of_sample_error(&mut self, generator: &DataGenerator, n_points: usize) -> Result<f64> {
        let sample = generator.sample(n_points, &mut self.rng)?;
        self.mean_cross_entropy(&with_bias(&sample.inputs), &sample.labels)
    }

    fn mean_cross_entropy(&self, features: &Matrix, labels: &Vector) -> Result<f64> {
        if labels.is_empty() {
            return Err(LearnError::EmptyDataset);
        }

        let mut total = 0.0;
        for (x, &y) in features.rows().into_iter().zip(labels.iter()) {
            total += self.cross_entropy_error(x, y)?;
        }
        Ok(total / labels.len() as f64)
    }

    /// `θ(w·x)`, the estimated probability of the `+1` label.
    pub fn predict_proba(&self, features: &Matrix) -> Result<Vector> {
        if features.ncols() != self.weights.len() {
            return Err(LearnError::dimension(self.weights.len(), features.ncols()));
        }
        Ok(features.dot(&self.weights).mapv(Self::sigmoid))
    }

    pub fn predict(&self, features: &Matrix) -> Result<Vector> {
        classify(features, &self.weights)
    }

    fn sigmoid(z: f64) -> f64 {
        if z > 500.0 {
            1.0
        } else if z < -500.0 {
            0.0
        } else {
            1.0 / (1.0 + (-z).exp())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Interval;
    use crate::OUT_OF_SAMPLE_POINTS;
    use ndarray::array;

    fn init_logger() {
        let _ = pretty_env_logger::try_init();
    }

    fn problem(seed: u64, n: usize) -> (DataGenerator, Dataset) {
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = DataGenerator::random_line(Interval::default(), &mut rng);
        let training = generator.sample(n, &mut rng).unwrap();
        (generator, training)
    }

    #[test]
    fn test_gradient_at_zero_weights() {
        let training = Dataset::new(array![[2.0, -1.0]], array![1.0]).unwrap();
        let model = LogisticRegression::new(training);

        let gradient = model.gradient(array![1.0, 2.0, -1.0].view(), 1.0).unwrap();
        assert_eq!(gradient, array![-0.5, -1.0, 0.5]);
        assert!(model.gradient(array![1.0, 2.0].view(), 1.0).is_err());
    }

    #[test]
    fn test_update_weights() {
        let training = Dataset::new(array![[2.0, -1.0]], array![1.0]).unwrap();
        let mut model = LogisticRegression::new(training).learning_rate(0.1);

        model.update_weights(&array![-1.0, 2.0, 0.0]).unwrap();
        assert_eq!(model.weights, array![0.1, -0.2, 0.0]);

        let err = model.update_weights(&array![1.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            LearnError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_training_improves_on_zero_weights() {
        init_logger();
        let (generator, training) = problem(17, 100);
        let mut model = LogisticRegression::new(training).random_state(17);

        let baseline = model.out_of_sample_error(&generator, OUT_OF_SAMPLE_POINTS).unwrap();
        assert!((baseline - 2f64.ln()).abs() < 1e-12);

        let epochs = model.learn().unwrap();
        assert!(epochs > 0);
        assert_eq!(model.epochs, epochs);

        let eout = model.out_of_sample_error(&generator, OUT_OF_SAMPLE_POINTS).unwrap();
        let ein = model.in_sample_error().unwrap();
        assert!(eout < baseline, "Eout {} >= {}", eout, baseline);
        assert!(ein < baseline, "Ein {} >= {}", ein, baseline);
    }

    #[test]
    fn test_homework_scenario() {
        init_logger();
        let runs = 10;
        let mut total_epochs = 0;
        let mut total_eout = 0.0;

        for run in 0..runs {
            let (generator, training) = problem(run, 100);
            let mut model = LogisticRegression::new(training)
                .learning_rate(0.01)
                .tolerance(0.01)
                .max_epochs(100_000)
                .random_state(run);
            total_epochs += model.learn().unwrap();
            total_eout += model
                .out_of_sample_error(&generator, OUT_OF_SAMPLE_POINTS)
                .unwrap();
        }

        let epochs = total_epochs as f64 / runs as f64;
        let eout = total_eout / runs as f64;
        assert!((150.0..=600.0).contains(&epochs), "mean epochs {}", epochs);
        assert!(eout < 0.2, "mean Eout {}", eout);
    }

    #[test]
    fn test_non_convergence() {
        let (_, training) = problem(3, 100);
        let mut model = LogisticRegression::new(training)
            .tolerance(1e-12)
            .max_epochs(3)
            .random_state(3);

        let err = model.learn().unwrap_err();
        assert!(matches!(err, LearnError::NonConvergence { limit: 3 }));
        assert_eq!(model.epochs, 3);
    }

    #[test]
    fn test_epoch_cap_defaults() {
        let (_, training) = problem(4, 20);
        let model = LogisticRegression::new(training);
        assert_eq!(model.max_epochs, Some(DEFAULT_MAX_EPOCHS));

        let model = model.max_epochs(5).unbounded();
        assert_eq!(model.max_epochs, None);
    }

    #[test]
    fn test_predictions() {
        let training = Dataset::new(array![[0.0, 0.5], [0.0, -0.5]], array![1.0, -1.0]).unwrap();
        let mut model = LogisticRegression::new(training);
        model.weights = array![0.0, 0.0, 4.0];

        let features = array![[1.0, 0.0, 0.5], [1.0, 0.0, -0.5], [1.0, 0.3, 0.0]];
        let probabilities = model.predict_proba(&features).unwrap();
        assert!(probabilities[0] > 0.8);
        assert!(probabilities[1] < 0.2);
        assert!((probabilities[2] - 0.5).abs() < 1e-12);
        assert_eq!(model.predict(&features).unwrap(), array![1.0, -1.0, -1.0]);

        assert!(model.predict_proba(&array![[1.0, 0.0]]).is_err());
        assert!(LogisticRegression::sigmoid(1000.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-1000.0) < 0.01);
    }
}
