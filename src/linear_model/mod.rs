//! Linear models for binary classification with `±1` labels.
//!
//! This module provides:
//! - `Perceptron`: mistake-driven perceptron learning algorithm (PLA)
//! - `LinearRegression`: pseudo-inverse linear regression, optionally with
//!   weight decay and a non-linear feature transformation
//! - `LogisticRegression`: cross-entropy logistic regression trained with
//!   stochastic gradient descent
//!
//! Every model owns its training set and its random generator. Seed the
//! generator with `random_state` for reproducible runs.
//!
//! # Examples
//!
//! ## Linear Regression
//! ```rust
//! use lfdkit::{DataGenerator, Interval, LinearRegression};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let generator = DataGenerator::random_line(Interval::default(), &mut rng);
//!
//! let mut model = LinearRegression::new(generator.sample(100, &mut rng)?).random_state(3);
//! model.learn()?;
//! let ein = model.in_sample_error()?;
//! let eout = model.out_of_sample_error(&generator, 1000)?;
//! # let _ = (ein, eout);
//! # Ok::<(), lfdkit::LearnError>(())
//! ```
//!
//! ## Logistic Regression
//! ```rust
//! use lfdkit::{DataGenerator, Interval, LogisticRegression};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(5);
//! let generator = DataGenerator::random_line(Interval::default(), &mut rng);
//!
//! let mut model = LogisticRegression::new(generator.sample(100, &mut rng)?)
//!     .learning_rate(0.01)
//!     .tolerance(0.01)
//!     .random_state(5);
//! let epochs = model.learn()?;
//! let eout = model.out_of_sample_error(&generator, 1000)?;
//! # let _ = (epochs, eout);
//! # Ok::<(), lfdkit::LearnError>(())
//! ```

mod linear_regression;
mod logistic_regression;
mod perceptron;

pub use linear_regression::LinearRegression;
pub use logistic_regression::{DEFAULT_MAX_EPOCHS, LogisticRegression};
pub use perceptron::{DEFAULT_MAX_ITERATIONS, Perceptron};

use crate::metrics::sign;
use crate::{LearnError, Matrix, Result, Vector};

/// `sign(x·w)` for every row of `features`.
fn classify(features: &Matrix, weights: &Vector) -> Result<Vector> {
    if features.ncols() != weights.len() {
        return Err(LearnError::dimension(weights.len(), features.ncols()));
    }
    Ok(features.dot(weights).mapv(sign))
}
