//! Error types for forest configuration, fitting and scoring.

use thiserror::Error;

/// Errors surfaced by [`Forest`](crate::Forest) operations.
///
/// Every variant is detected before any tree is built or any score is written,
/// so a failed call never leaves a partially fitted ensemble behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    /// Subsample size must lie in `[1, nobjs]`.
    #[error("subsample size must be between 1 and {nobjs}, got {sample_size}")]
    InvalidSampleSize { sample_size: usize, nobjs: usize },

    /// Extension level must lie in `[0, dim - 1]`.
    #[error("data has {dim} dimensions, extension level must be at most {max}, got {extension_level}", max = .dim.saturating_sub(1))]
    InvalidExtensionLevel { extension_level: usize, dim: usize },

    #[error("number of trees must be > 0")]
    InvalidTreeCount,

    #[error("data must have at least one dimension")]
    ZeroDimensions,

    /// The row-major buffer does not hold `nobjs * dim` values.
    #[error("expected {nobjs} x {dim} values, got {len}")]
    DataShape { len: usize, nobjs: usize, dim: usize },

    #[error("training data contains a non-finite value at index {index}")]
    NonFiniteInput { index: usize },

    /// Query buffer length is not a multiple of the fitted dimension.
    #[error("query of {len} values is not a whole number of {dim}-dimensional rows")]
    QueryShape { len: usize, dim: usize },

    #[error("output buffer holds {got} values, expected {expected}")]
    OutputShape { got: usize, expected: usize },

    #[error("forest has not been fitted")]
    NotFitted,

    #[error("tree index {index} out of range for a forest of {ntrees} trees")]
    TreeIndexOutOfRange { index: usize, ntrees: usize },
}

/// Result type for forest operations.
pub type Result<T> = std::result::Result<T, ForestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_name_the_bounds() {
        let err = ForestError::InvalidSampleSize {
            sample_size: 300,
            nobjs: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("between 1 and 100"));
        assert!(msg.contains("300"));

        let err = ForestError::InvalidExtensionLevel {
            extension_level: 4,
            dim: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 dimensions"));
        assert!(msg.contains("at most 2"));
    }

    #[test]
    fn shape_errors_display() {
        let err = ForestError::DataShape {
            len: 7,
            nobjs: 4,
            dim: 2,
        };
        assert_eq!(err.to_string(), "expected 4 x 2 values, got 7");

        let err = ForestError::TreeIndexOutOfRange { index: 5, ntrees: 3 };
        assert!(err.to_string().contains("tree index 5"));
    }
}
