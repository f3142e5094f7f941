//! Small learning-from-data toolkit: perceptron, linear regression with
//! weight decay and logistic regression trained by stochastic gradient
//! descent, together with the synthetic data generators used to measure
//! in-sample and out-of-sample error.
//!
//! ```rust
//! use lfdkit::{DataGenerator, Interval, Perceptron};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let generator = DataGenerator::random_line(Interval::new(-1.0, 1.0)?, &mut rng);
//! let training = generator.sample(10, &mut rng)?;
//!
//! let mut pla = Perceptron::new(training).random_state(7);
//! let iterations = pla.converge()?;
//! let eout = pla.disagreement(&generator, 1000)?;
//! assert!(pla.misclassified()?.is_empty());
//! # let _ = (iterations, eout);
//! # Ok::<(), lfdkit::LearnError>(())
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod error;
pub mod linalg;
pub mod linear_model;
pub mod metrics;
pub mod preprocessing;
pub mod target;

pub use dataset::{DataGenerator, Dataset};
pub use error::{LearnError, Result};
pub use linear_model::{LinearRegression, LogisticRegression, Perceptron};
pub use preprocessing::FeatureMap;
pub use target::{Interval, LinearFunction, TargetFunction};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

/// Number of fresh points drawn when scoring a hypothesis out of sample.
pub const OUT_OF_SAMPLE_POINTS: usize = 1000;
