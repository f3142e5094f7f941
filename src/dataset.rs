use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use ndarray::{ArrayView1, ArrayView2, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;

use crate::target::{Interval, LinearFunction, TargetFunction};
use crate::{LearnError, Matrix, Result, Vector};

/// Labelled samples.
///
/// `inputs` keeps the raw coordinates, `features` is the design matrix the
/// learners work on. Right after construction `features` is `inputs` with a
/// leading bias column of ones; [`Dataset::transform`] replaces it.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub inputs: Matrix,
    pub features: Matrix,
    pub labels: Vector,
}

impl Dataset {
    pub fn new(inputs: Matrix, labels: Vector) -> Result<Self> {
        if inputs.nrows() != labels.len() {
            return Err(LearnError::dimension(inputs.nrows(), labels.len()));
        }
        if inputs.nrows() == 0 {
            return Err(LearnError::EmptyDataset);
        }

        let features = with_bias(&inputs);
        Ok(Self {
            inputs,
            features,
            labels,
        })
    }

    /// Batch input where the last column holds the label.
    pub fn from_array(data: ArrayView2<f64>) -> Result<Self> {
        if data.ncols() < 2 {
            return Err(LearnError::InvalidParameter(format!(
                "rows need at least one feature and a label, got {} column(s)",
                data.ncols()
            )));
        }

        let label_column = data.ncols() - 1;
        let inputs = data.slice(s![.., ..label_column]).to_owned();
        let labels = data.column(label_column).to_owned();
        Self::new(inputs, labels)
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().map(Vec::len).ok_or(LearnError::EmptyDataset)?;
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(LearnError::dimension(width, row.len()));
        }

        let data = Matrix::from_shape_fn((rows.len(), width), |(i, j)| rows[i][j]);
        Self::from_array(data.view())
    }

    /// Reads whitespace separated `x1 x2 y` lines. Blank lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Same as [`Dataset::from_file`]; `name` tags parse errors.
    pub fn from_reader<R: BufRead>(reader: R, name: &str) -> Result<Self> {
        let mut rows = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            if fields.len() != 3 {
                return Err(LearnError::Parse {
                    file: name.to_string(),
                    line: line_number,
                    message: format!("expected 3 fields (x1 x2 y), found {}", fields.len()),
                });
            }

            let mut row = Vec::with_capacity(3);
            for (field, column) in fields.iter().zip(["x1", "x2", "y"]) {
                let value = field.parse::<f64>().map_err(|e| LearnError::Parse {
                    file: name.to_string(),
                    line: line_number,
                    message: format!("{} unable to parse {:?}: {}", column, field, e),
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        let dataset = Self::from_rows(&rows)?;
        debug!("loaded {} samples from {}", dataset.n_samples(), name);
        Ok(dataset)
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn n_inputs(&self) -> usize {
        self.inputs.ncols()
    }

    /// Raw inputs with the bias coordinate, the argument of every feature map.
    pub fn augmented_inputs(&self) -> Matrix {
        with_bias(&self.inputs)
    }

    /// Rebuilds `features` as `f(1, x...)` for every sample.
    pub fn transform<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(ArrayView1<f64>) -> Vector,
    {
        self.features = apply_feature_map(&self.augmented_inputs(), f)?;
        Ok(())
    }

    /// First `n` samples, then the rest. Both parts must be non-empty.
    pub fn split_at(&self, n: usize) -> Result<(Self, Self)> {
        if n == 0 || n >= self.n_samples() {
            return Err(LearnError::InvalidParameter(format!(
                "split point must be within 1..{}, got {}",
                self.n_samples(),
                n
            )));
        }

        let head = Self {
            inputs: self.inputs.slice(s![..n, ..]).to_owned(),
            features: self.features.slice(s![..n, ..]).to_owned(),
            labels: self.labels.slice(s![..n]).to_owned(),
        };
        let tail = Self {
            inputs: self.inputs.slice(s![n.., ..]).to_owned(),
            features: self.features.slice(s![n.., ..]).to_owned(),
            labels: self.labels.slice(s![n..]).to_owned(),
        };

        Ok((head, tail))
    }
}

/// Maps every row of `points` through `f`, requiring a constant output length.
pub(crate) fn apply_feature_map<F>(points: &Matrix, f: F) -> Result<Matrix>
where
    F: Fn(ArrayView1<f64>) -> Vector,
{
    let n = points.nrows();
    let mut rows = Vec::with_capacity(n);
    for row in points.rows() {
        rows.push(f(row));
    }

    let width = rows.first().map(|row| row.len()).unwrap_or(0);
    let mut features = Matrix::zeros((n, width));
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(LearnError::dimension(width, row.len()));
        }
        features.row_mut(i).assign(row);
    }

    Ok(features)
}

pub(crate) fn with_bias(inputs: &Matrix) -> Matrix {
    let mut x = Matrix::ones((inputs.nrows(), inputs.ncols() + 1));
    x.slice_mut(s![.., 1..]).assign(inputs);
    x
}

/// Draws points uniformly in `interval²` and labels them with a target
/// function, flipping a fraction `noise` of the labels.
#[derive(Clone, Debug)]
pub struct DataGenerator {
    interval: Interval,
    target: TargetFunction,
    noise: f64,
}

impl DataGenerator {
    pub fn new<T: Into<TargetFunction>>(interval: Interval, target: T) -> Self {
        Self {
            interval,
            target: target.into(),
            noise: 0.0,
        }
    }

    /// Target is the line through two random points of the square.
    pub fn random_line<R: Rng>(interval: Interval, rng: &mut R) -> Self {
        let line = LinearFunction::from_random_points(&interval, rng);
        debug!("random target function: {}", line);
        Self::new(interval, line)
    }

    /// Probability in `[0, 1]` that a label is flipped.
    pub fn noise(mut self, noise: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(LearnError::InvalidParameter(format!(
                "noise must be within [0, 1], got {}",
                noise
            )));
        }
        self.noise = noise;
        Ok(self)
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn target(&self) -> &TargetFunction {
        &self.target
    }

    pub fn noise_level(&self) -> f64 {
        self.noise
    }

    /// Target label of `(x1, x2)`, possibly flipped by noise.
    pub fn label<R: Rng>(&self, x1: f64, x2: f64, rng: &mut R) -> f64 {
        let label = self.target.label(x1, x2);
        if self.noise > 0.0 && rng.gen_bool(self.noise) {
            return -label;
        }
        label
    }

    /// `n` raw points, one per row, uniform in the square.
    pub fn sample_inputs<R: Rng>(&self, n: usize, rng: &mut R) -> Matrix {
        let min = self.interval.min();
        let size = self.interval.size();
        Matrix::random_using((n, 2), Uniform::new(0.0, 1.0), rng).mapv(|u| min + u * size)
    }

    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Dataset> {
        let inputs = self.sample_inputs(n, rng);
        let labels = inputs
            .rows()
            .into_iter()
            .map(|point| self.label(point[0], point[1], rng))
            .collect::<Vector>();

        Dataset::new(inputs, labels)
    }
}
