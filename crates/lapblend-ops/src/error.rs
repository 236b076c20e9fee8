//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sequence does not hold `levels + 1` images.
    #[error("{what} has {actual} levels, expected {expected}")]
    LevelMismatch {
        /// Which sequence was wrong
        what: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Error from the underlying image type.
    #[error(transparent)]
    Core(#[from] lapblend_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
