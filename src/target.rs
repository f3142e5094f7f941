//! Target functions used to label synthetic points in the plane.

use std::fmt;
use std::sync::Arc;

use log::warn;
use rand::Rng;

use crate::metrics::sign;
use crate::{LearnError, Result};

/// Bounded interval `[min, max)` of the coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min <= max) {
            return Err(LearnError::InvalidParameter(format!(
                "interval min ({}) must not exceed max ({})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Uniform draw from `[min, max)`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.min + rng.gen_range(0.0..1.0) * self.size()
    }

    /// Uniform point in the square `[min, max)²`.
    pub fn sample_point<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        (self.sample(rng), self.sample(rng))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self { min: -1.0, max: 1.0 }
    }
}

/// `f(x) = slope * x + intercept`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFunction {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFunction {
    // redraws allowed when both points share the same x
    const MAX_RESAMPLES: usize = 100;

    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Line through two random points of the square spanned by `interval`.
    ///
    /// A pair sharing the same `x` is redrawn. If the interval is degenerate
    /// and no valid pair can be found, the line is horizontal through the
    /// first point.
    pub fn from_random_points<R: Rng>(interval: &Interval, rng: &mut R) -> Self {
        for _ in 0..Self::MAX_RESAMPLES {
            let (x1, y1) = interval.sample_point(rng);
            let (x2, y2) = interval.sample_point(rng);

            if x1 == x2 {
                warn!("random line points share x = {}, resampling", x1);
                continue;
            }

            let slope = (y2 - y1) / (x2 - x1);
            return Self::new(slope, y1 - slope * x1);
        }

        Self::new(0.0, interval.sample(rng))
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl fmt::Display for LinearFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x + {:.2}", self.slope, self.intercept)
    }
}

/// Labelling rule of a point `(x1, x2)`, dispatched explicitly by arity.
#[derive(Clone)]
pub enum TargetFunction {
    /// Boundary curve `x2 = f(x1)`: points below it are `-1`, the rest `+1`.
    Arity1(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
    /// Decision function: the label is `sign(f(x1, x2))`.
    Arity2(Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>),
}

impl TargetFunction {
    pub fn boundary<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Arity1(Arc::new(f))
    }

    pub fn decision<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self::Arity2(Arc::new(f))
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Arity1(_) => 1,
            Self::Arity2(_) => 2,
        }
    }

    pub fn label(&self, x1: f64, x2: f64) -> f64 {
        match self {
            Self::Arity1(f) => {
                if x2 < f(x1) {
                    -1.0
                } else {
                    1.0
                }
            }
            Self::Arity2(f) => sign(f(x1, x2)),
        }
    }
}

impl From<LinearFunction> for TargetFunction {
    fn from(line: LinearFunction) -> Self {
        Self::boundary(move |x| line.evaluate(x))
    }
}

impl fmt::Debug for TargetFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetFunction(arity = {})", self.arity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_interval_sample_in_bounds() {
        let interval = Interval::new(-1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..10_000 {
            let v = interval.sample(&mut rng);
            assert!(v >= -1.0 && v < 1.0);
        }
    }

    #[test]
    fn test_interval_mean() {
        let interval = Interval::new(0.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let n = 20_000;
        let mean = (0..n).map(|_| interval.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_invalid_interval() {
        assert!(Interval::new(1.0, -1.0).is_err());
        assert!(Interval::new(f64::NAN, 1.0).is_err());

        let point = Interval::new(2.0, 2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(point.sample(&mut rng), 2.0);
    }

    #[test]
    fn test_linear_function_from_random_points() {
        let interval = Interval::default();
        let mut rng = StdRng::seed_from_u64(4);

        let line = LinearFunction::from_random_points(&interval, &mut rng);
        assert!(line.slope.is_finite());
        assert!(line.intercept.is_finite());
        assert_eq!(line.evaluate(0.0), line.intercept);
        assert!((line.evaluate(1.0) - (line.slope + line.intercept)).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_interval_gives_horizontal_line() {
        let interval = Interval::new(0.5, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let line = LinearFunction::from_random_points(&interval, &mut rng);
        assert_eq!(line, LinearFunction::new(0.0, 0.5));
    }

    #[test]
    fn test_target_labels() {
        let line: TargetFunction = LinearFunction::new(1.0, 0.0).into();
        assert_eq!(line.arity(), 1);
        assert_eq!(line.label(0.5, 0.0), -1.0);
        assert_eq!(line.label(0.5, 0.9), 1.0);
        assert_eq!(line.label(0.5, 0.5), 1.0);

        let circle = TargetFunction::decision(|x1, x2| x1 * x1 + x2 * x2 - 0.6);
        assert_eq!(circle.arity(), 2);
        assert_eq!(circle.label(0.0, 0.0), -1.0);
        assert_eq!(circle.label(0.9, 0.9), 1.0);
    }
}
