use thiserror::Error;

#[derive(Debug, Error)]
pub enum LearnError {
    #[error("singular matrix: pivot column {column} is entirely zero")]
    SingularMatrix { column: usize },
    #[error("matrix must be square, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },
    #[error("dimension mismatch: expected length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
    #[error("no convergence within {limit} steps")]
    NonConvergence { limit: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("data set is empty")]
    EmptyDataset,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LearnError {
    pub fn dimension(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

pub type Result<T> = std::result::Result<T, LearnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LearnError::NonConvergence { limit: 3 }.to_string(),
            "no convergence within 3 steps"
        );
        assert_eq!(
            LearnError::dimension(3, 2).to_string(),
            "dimension mismatch: expected length 3, got 2"
        );
    }
}
