//! Error types for lapblend-core operations.
//!
//! # Usage
//!
//! ```rust
//! use lapblend_core::{Error, Result};
//!
//! fn check_channels(channels: usize) -> Result<()> {
//!     if channels != 1 && channels != 3 {
//!         return Err(Error::UnsupportedChannels(channels));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_channels(4).is_err());
//! ```

use crate::image::Shape;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or combining [`crate::Image`] buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Width, height or channel count is zero, or the sample count overflows.
    #[error("invalid dimensions: {width}x{height}x{channels} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Requested channel count
        channels: usize,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Sample buffer length does not match the declared shape.
    #[error("data size mismatch: expected {expected} samples, got {actual}")]
    DataSizeMismatch {
        /// Samples implied by the shape
        expected: usize,
        /// Samples actually supplied
        actual: usize,
    },

    /// Two images that must share a shape do not.
    #[error("dimension mismatch: {a} vs {b}")]
    DimensionMismatch {
        /// Shape of the left operand
        a: Shape,
        /// Shape of the right operand
        b: Shape,
    },

    /// Channel count other than 1 (mask) or 3 (color).
    #[error("unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`].
    #[inline]
    pub fn invalid_dimensions(
        width: usize,
        height: usize,
        channels: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            channels,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`].
    #[inline]
    pub fn dimension_mismatch(a: Shape, b: Shape) -> Self {
        Self::DimensionMismatch { a, b }
    }
}
