//! Floating-point image buffer used by every pyramid stage.
//!
//! Samples are stored interleaved in row-major order, so the sample for
//! channel `c` of pixel `(x, y)` lives at `(y * width + x) * channels + c`.
//! An [`Image`] owns its buffer; every arithmetic operation produces a new
//! image rather than mutating one that another pyramid level may still read.
//!
//! # Example
//!
//! ```rust
//! use lapblend_core::{Image, Shape};
//!
//! let a = Image::filled(Shape::new(4, 4, 3), 0.75);
//! let b = Image::filled(Shape::new(4, 4, 3), 0.25);
//! let diff = a.sub(&b).unwrap();
//! assert_eq!(diff.get(0, 0, 0), 0.5);
//! ```

use crate::error::{Error, Result};
use rayon::prelude::*;
use std::fmt;

/// Spatial and channel dimensions of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Samples per pixel (1 for masks, 3 for color).
    pub channels: usize,
}

impl Shape {
    /// Creates a new shape.
    #[inline]
    pub const fn new(width: usize, height: usize, channels: usize) -> Self {
        Self { width, height, channels }
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of samples (`width * height * channels`).
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels
    }

    /// Returns true when both shapes cover the same pixel grid,
    /// regardless of channel count.
    #[inline]
    pub fn same_plane(&self, other: &Shape) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Checks that the shape is non-empty and its sample count fits in `usize`.
    pub fn validate(&self) -> Result<usize> {
        if self.width == 0 || self.height == 0 || self.channels == 0 {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                self.channels,
                "width, height and channels must be > 0",
            ));
        }
        self.width
            .checked_mul(self.height)
            .and_then(|v| v.checked_mul(self.channels))
            .ok_or_else(|| {
                Error::invalid_dimensions(
                    self.width,
                    self.height,
                    self.channels,
                    "sample count overflows",
                )
            })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Owned `f32` image with interleaved channels.
#[derive(Clone, PartialEq)]
pub struct Image {
    shape: Shape,
    data: Vec<f32>,
}

impl Image {
    /// Creates a zero-filled image.
    pub fn zeros(shape: Shape) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Creates an image with every sample set to `value`.
    pub fn filled(shape: Shape, value: f32) -> Self {
        Self {
            shape,
            data: vec![value; shape.sample_count()],
        }
    }

    /// Wraps an existing sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for empty or overflowing shapes
    /// and [`Error::DataSizeMismatch`] when `data.len()` disagrees with them.
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        let shape = Shape::new(width, height, channels);
        let expected = shape.validate()?;
        if data.len() != expected {
            return Err(Error::DataSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Builds an image by evaluating `f(x, y, c)` for every sample.
    pub fn from_fn<F>(shape: Shape, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(shape.sample_count());
        for y in 0..shape.height {
            for x in 0..shape.width {
                for c in 0..shape.channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self { shape, data }
    }

    /// Image shape.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape.height
    }

    /// Samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the raw samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the image and returns its sample buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Buffer index of sample `(x, y, c)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.shape.width + x) * self.shape.channels + c
    }

    /// Sample at `(x, y, c)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.index(x, y, c)]
    }

    /// Sets sample `(x, y, c)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f32) {
        let idx = self.index(x, y, c);
        self.data[idx] = value;
    }

    /// Samples of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let stride = self.shape.width * self.shape.channels;
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Smallest and largest sample, ignoring NaN. `None` for empty images
    /// or images made only of NaN.
    pub fn sample_range(&self) -> Option<(f32, f32)> {
        let (min, max) = self
            .data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        (min <= max).then_some((min, max))
    }

    /// Returns true when all samples share one value (or there are none).
    pub fn is_constant(&self) -> bool {
        match self.sample_range() {
            Some((min, max)) => max - min <= 0.0,
            None => true,
        }
    }

    /// Applies `f` to every sample, producing a new image.
    pub fn map<F>(&self, f: F) -> Image
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        Image {
            shape: self.shape,
            data: self.data.par_iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combines two same-shaped images sample by sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the shapes differ.
    pub fn zip_map<F>(&self, other: &Image, f: F) -> Result<Image>
    where
        F: Fn(f32, f32) -> f32 + Sync + Send,
    {
        if self.shape != other.shape {
            return Err(Error::dimension_mismatch(self.shape, other.shape));
        }
        let data = self
            .data
            .par_iter()
            .zip(other.data.par_iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Image { shape: self.shape, data })
    }

    /// Pointwise `self - other`, unclamped.
    pub fn sub(&self, other: &Image) -> Result<Image> {
        self.zip_map(other, |a, b| a - b)
    }

    /// Pointwise `self + other`, unclamped.
    pub fn add(&self, other: &Image) -> Result<Image> {
        self.zip_map(other, |a, b| a + b)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("shape", &self.shape)
            .field("samples", &self.data.len())
            .finish()
    }
}
