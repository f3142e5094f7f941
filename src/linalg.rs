//! Dense linear algebra used by linear regression.
//!
//! Inversion goes through an LUP factorisation `PA = LU` with partial (row)
//! pivoting. `L` (unit lower triangular, diagonal implied) and `U` share a
//! single matrix, and `P` is kept as a row permutation.

use crate::{LearnError, Matrix, Result, Vector};
use ndarray::ArrayView1;

#[derive(Clone, Debug)]
pub struct LupDecomposition {
    lu: Matrix,
    permutation: Vec<usize>,
}

impl LupDecomposition {
    /// Factorises a square matrix.
    ///
    /// For each column the row with the largest absolute entry at or below
    /// the diagonal becomes the pivot. A column whose candidates are all
    /// exactly zero makes the matrix singular.
    pub fn decompose(a: &Matrix) -> Result<Self> {
        ensure_square(a)?;

        let n = a.nrows();
        let mut lu = a.clone();
        let mut permutation: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let mut pivot = 0.0;
            let mut pivot_row = k;
            for i in k..n {
                if lu[(i, k)].abs() > pivot {
                    pivot = lu[(i, k)].abs();
                    pivot_row = i;
                }
            }

            if pivot == 0.0 {
                return Err(LearnError::SingularMatrix { column: k });
            }

            if pivot_row != k {
                permutation.swap(k, pivot_row);
                for j in 0..n {
                    lu.swap((k, j), (pivot_row, j));
                }
            }

            for i in (k + 1)..n {
                lu[(i, k)] /= lu[(k, k)];
                let factor = lu[(i, k)];
                for j in (k + 1)..n {
                    lu[(i, j)] -= factor * lu[(k, j)];
                }
            }
        }

        Ok(Self { lu, permutation })
    }

    /// Combined `L` (strictly below the diagonal) and `U` factors.
    pub fn lu(&self) -> &Matrix {
        &self.lu
    }

    /// `permutation[i]` is the row of the original matrix that ended up at row `i`.
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Solves `A x = b` by forward then back substitution.
    pub fn solve(&self, b: ArrayView1<f64>) -> Result<Vector> {
        let n = self.lu.nrows();
        if b.len() != n {
            return Err(LearnError::dimension(n, b.len()));
        }

        let mut y = Vector::zeros(n);
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..i {
                sum += self.lu[(i, j)] * y[j];
            }
            y[i] = b[self.permutation[i]] - sum;
        }

        let mut x = Vector::zeros(n);
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..n {
                sum += self.lu[(i, j)] * x[j];
            }
            x[i] = (y[i] - sum) / self.lu[(i, i)];
        }

        Ok(x)
    }
}

/// Inverts a square matrix by solving `A x_i = e_i` for every basis column.
pub fn inverse(a: &Matrix) -> Result<Matrix> {
    ensure_square(a)?;

    let n = a.nrows();
    let lup = LupDecomposition::decompose(a)?;
    let mut inv = Matrix::zeros((n, n));
    let mut e = Vector::zeros(n);

    for i in 0..n {
        e.fill(0.0);
        e[i] = 1.0;
        let column = lup.solve(e.view())?;
        inv.column_mut(i).assign(&column);
    }

    Ok(inv)
}

/// Least-squares solution operator `(XᵗX + λI)⁻¹ Xᵗ`. `lambda = 0` gives the
/// plain pseudo-inverse.
pub fn pseudo_inverse(x: &Matrix, lambda: f64) -> Result<Matrix> {
    let xt = x.t();
    let mut xtx = xt.dot(x);
    for i in 0..xtx.nrows() {
        xtx[(i, i)] += lambda;
    }

    let xtx_inv = inverse(&xtx)?;
    Ok(xtx_inv.dot(&xt))
}

/// Inner product with an eager length check.
pub fn dot(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(LearnError::dimension(a.len(), b.len()));
    }
    Ok(a.dot(&b))
}

pub fn norm(v: ArrayView1<f64>) -> f64 {
    v.dot(&v).sqrt()
}

fn ensure_square(a: &Matrix) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(LearnError::NonSquareMatrix {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_identity(m: &Matrix) {
        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (m[(i, j)] - expected).abs() < 1e-9,
                    "entry ({}, {}) = {}",
                    i,
                    j,
                    m[(i, j)]
                );
            }
        }
    }

    #[test]
    fn test_inverse_2x2() {
        let a = array![[4.0, 7.0], [2.0, 6.0]];
        let inv = inverse(&a).unwrap();

        let expected = array![[0.6, -0.7], [-0.2, 0.4]];
        for (got, want) in inv.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let a = array![
            [0.0, 2.0, 1.0, -3.0],
            [1.5, -1.0, 4.0, 0.5],
            [2.0, 0.0, -2.0, 1.0],
            [-1.0, 3.0, 0.5, 2.0]
        ];
        let inv = inverse(&a).unwrap();

        assert_identity(&a.dot(&inv));
        assert_identity(&inv.dot(&a));
    }

    #[test]
    fn test_decompose_reconstructs_permuted_matrix() {
        let a = array![[1.0, 2.0, 0.0], [3.0, 1.0, 4.0], [5.0, 2.0, 1.0]];
        let lup = LupDecomposition::decompose(&a).unwrap();
        let n = a.nrows();

        let mut l = Matrix::eye(n);
        let mut u = Matrix::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                if j < i {
                    l[(i, j)] = lup.lu()[(i, j)];
                } else {
                    u[(i, j)] = lup.lu()[(i, j)];
                }
            }
        }

        let product = l.dot(&u);
        for (i, &row) in lup.permutation().iter().enumerate() {
            for j in 0..n {
                assert!((product[(i, j)] - a[(row, j)]).abs() < 1e-12);
            }
        }
        // largest entry of the first column is picked as the first pivot
        assert_eq!(lup.permutation()[0], 2);
    }

    #[test]
    fn test_solve() {
        let a = array![[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]];
        let b = array![8.0, -11.0, -3.0];

        let lup = LupDecomposition::decompose(&a).unwrap();
        let x = lup.solve(b.view()).unwrap();

        let expected = [2.0, 3.0, -1.0];
        for (got, want) in x.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-10);
        }
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        let lup = LupDecomposition::decompose(&a).unwrap();

        let err = lup.solve(array![1.0, 2.0, 3.0].view()).unwrap_err();
        assert!(matches!(
            err,
            LearnError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_singular_matrix() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let err = inverse(&a).unwrap_err();
        assert!(matches!(err, LearnError::SingularMatrix { column: 1 }));

        let zero_column = array![[0.0, 1.0], [0.0, 3.0]];
        let err = LupDecomposition::decompose(&zero_column).unwrap_err();
        assert!(matches!(err, LearnError::SingularMatrix { column: 0 }));
    }

    #[test]
    fn test_non_square_matrix() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let err = inverse(&a).unwrap_err();
        assert!(matches!(err, LearnError::NonSquareMatrix { rows: 2, cols: 3 }));
    }

    #[test]
    fn test_pseudo_inverse_fits_line() {
        // first column being the bias
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];

        let w = pseudo_inverse(&x, 0.0).unwrap().dot(&y);
        assert!((w[0] - 1.0).abs() < 1e-10);
        assert!((w[1] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_dot_checks_length() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![4.0, 5.0, 6.0];
        assert_eq!(dot(a.view(), b.view()).unwrap(), 32.0);
        assert!(dot(a.view(), array![1.0].view()).is_err());
        assert_eq!(norm(array![3.0, 4.0].view()), 5.0);
    }
}
