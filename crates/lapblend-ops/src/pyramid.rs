//! Gaussian and Laplacian sequences.
//!
//! Both sequences keep every level at the input resolution: levels differ
//! only in how many blur passes they have seen, never in size.
//!
//! - [`GaussianSequence`]: element 0 is the input, element `i` is element
//!   `i - 1` blurred once.
//! - [`LaplacianSequence`]: elements `0..levels` are band-pass residuals,
//!   the last element is the remaining low-pass image. Summing every element
//!   gives back the input.
//!
//! # Example
//!
//! ```rust
//! use lapblend_core::{Image, Shape};
//! use lapblend_ops::pyramid::PyramidBuilder;
//!
//! let img = Image::from_fn(Shape::new(16, 16, 3), |x, y, _| ((x ^ y) & 1) as f32);
//! let builder = PyramidBuilder::default();
//!
//! let g = builder.gaussian_sequence(&img, 3).unwrap();
//! let l = builder.laplacian_sequence(&img, 3).unwrap();
//! assert_eq!(g.len(), 4);
//! assert_eq!(l.len(), 4);
//!
//! let rebuilt = l.collapse().unwrap();
//! assert!((rebuilt.get(3, 5, 0) - img.get(3, 5, 0)).abs() < 1e-5);
//! ```

use crate::filter::{BorderMode, GaussianBlur};
use crate::{OpsError, OpsResult};
use lapblend_core::{Image, Shape};
use std::ops::Index;
use tracing::{debug, trace};

/// Blur kernel size used at every level.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

/// Blur sigma used at every level.
pub const DEFAULT_SIGMA: f32 = 4.0;

/// Blur parameters shared by every level of a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidConfig {
    /// Taps of the separable Gaussian (odd).
    pub kernel_size: usize,
    /// Gaussian sigma; non-positive values are derived from `kernel_size`.
    pub sigma: f32,
    /// Border handling for the blur.
    pub border: BorderMode,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
            border: BorderMode::Reflect101,
        }
    }
}

fn check_levels(what: &'static str, images: &[Image]) -> OpsResult<()> {
    let first = images.first().ok_or_else(|| {
        OpsError::InvalidParameter(format!("{} must hold at least one image", what))
    })?;
    let shape = first.shape();
    if let Some((i, bad)) = images.iter().enumerate().find(|(_, img)| img.shape() != shape) {
        return Err(OpsError::SizeMismatch(format!(
            "{} level {} is {}, level 0 is {}",
            what,
            i,
            bad.shape(),
            shape
        )));
    }
    Ok(())
}

/// Progressively blurred copies of one image, finest first.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSequence {
    levels: Vec<Image>,
}

impl GaussianSequence {
    /// Wraps pre-built levels. All levels must share one shape.
    pub fn from_levels(levels: Vec<Image>) -> OpsResult<Self> {
        check_levels("gaussian sequence", &levels)?;
        Ok(Self { levels })
    }

    /// Number of images (`levels + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; a sequence holds at least the input image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of blur steps.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels.len() - 1
    }

    /// Shape shared by every level.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.levels[0].shape()
    }

    /// Level `i`, if present.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&Image> {
        self.levels.get(i)
    }

    /// Iterates from the unblurred input to the most blurred level.
    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.levels.iter()
    }

    /// Consumes the sequence.
    pub fn into_inner(self) -> Vec<Image> {
        self.levels
    }
}

impl Index<usize> for GaussianSequence {
    type Output = Image;

    fn index(&self, i: usize) -> &Image {
        &self.levels[i]
    }
}

/// Band-pass residuals plus a final low-pass remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct LaplacianSequence {
    bands: Vec<Image>,
}

impl LaplacianSequence {
    /// Wraps pre-built bands. All bands must share one shape.
    pub fn from_levels(bands: Vec<Image>) -> OpsResult<Self> {
        check_levels("laplacian sequence", &bands)?;
        Ok(Self { bands })
    }

    /// Number of images (`levels + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always false; a sequence holds at least the low-pass remainder.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Number of band-pass residuals.
    #[inline]
    pub fn levels(&self) -> usize {
        self.bands.len() - 1
    }

    /// Shape shared by every band.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.bands[0].shape()
    }

    /// Band `i`, if present.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&Image> {
        self.bands.get(i)
    }

    /// Iterates from the finest band to the low-pass remainder.
    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.bands.iter()
    }

    /// The low-pass remainder (last element).
    pub fn low_pass(&self) -> &Image {
        &self.bands[self.bands.len() - 1]
    }

    /// Consumes the sequence.
    pub fn into_inner(self) -> Vec<Image> {
        self.bands
    }

    /// Sums every band pointwise into one image.
    pub fn collapse(&self) -> OpsResult<Image> {
        let mut out = self.bands[0].clone();
        for band in &self.bands[1..] {
            out = out.add(band)?;
        }
        Ok(out)
    }
}

impl Index<usize> for LaplacianSequence {
    type Output = Image;

    fn index(&self, i: usize) -> &Image {
        &self.bands[i]
    }
}

/// Builds Gaussian and Laplacian sequences with one fixed blur.
#[derive(Debug, Clone, Default)]
pub struct PyramidBuilder {
    blur: GaussianBlur,
}

impl PyramidBuilder {
    /// Creates a builder from blur parameters.
    pub fn new(config: PyramidConfig) -> OpsResult<Self> {
        Ok(Self {
            blur: GaussianBlur::new(config.kernel_size, config.sigma, config.border)?,
        })
    }

    /// Creates a builder around an existing blur.
    pub fn with_blur(blur: GaussianBlur) -> Self {
        Self { blur }
    }

    /// The blur applied between levels.
    pub fn blur(&self) -> &GaussianBlur {
        &self.blur
    }

    /// Returns `levels + 1` images: the input, then each previous level
    /// blurred once more. `levels == 0` yields just the input.
    pub fn gaussian_sequence(&self, image: &Image, levels: usize) -> OpsResult<GaussianSequence> {
        trace!(shape = %image.shape(), levels, "gaussian_sequence");

        let mut out = Vec::with_capacity(levels + 1);
        out.push(image.clone());
        for level in 1..=levels {
            let next = self.blur.apply(&out[level - 1])?;
            debug!(level, "gaussian level");
            out.push(next);
        }
        Ok(GaussianSequence { levels: out })
    }

    /// Returns `levels + 1` images: `levels` band-pass residuals and the
    /// final low-pass remainder.
    ///
    /// A running image starts at the input. At step `i` it is blurred once
    /// into `next`; the band is `gaussian[i] - next` and the running image
    /// becomes `next`. Residuals are not clamped.
    pub fn laplacian_sequence(&self, image: &Image, levels: usize) -> OpsResult<LaplacianSequence> {
        trace!(shape = %image.shape(), levels, "laplacian_sequence");

        let gaussian = self.gaussian_sequence(image, levels)?;
        let mut bands = Vec::with_capacity(levels + 1);
        let mut current = image.clone();

        for i in 0..levels {
            let next = self.blur.apply(&current)?;
            bands.push(gaussian[i].sub(&next)?);
            debug!(level = i, "laplacian band");
            current = next;
        }
        bands.push(current);

        Ok(LaplacianSequence { bands })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn checker(shape: Shape) -> Image {
        Image::from_fn(shape, |x, y, c| {
            let base = if (x / 2 + y / 2) % 2 == 0 { 0.9 } else { 0.1 };
            base - c as f32 * 0.05
        })
    }

    #[test]
    fn test_sequence_lengths() {
        let img = checker(Shape::new(12, 10, 3));
        let builder = PyramidBuilder::default();
        for levels in 0..5 {
            let g = builder.gaussian_sequence(&img, levels).unwrap();
            let l = builder.laplacian_sequence(&img, levels).unwrap();
            assert_eq!(g.len(), levels + 1);
            assert_eq!(l.len(), levels + 1);
            assert_eq!(g.levels(), levels);
            assert_eq!(l.levels(), levels);
        }
    }

    #[test]
    fn test_zero_levels_is_identity() {
        let img = checker(Shape::new(7, 5, 3));
        let builder = PyramidBuilder::default();

        let g = builder.gaussian_sequence(&img, 0).unwrap();
        assert_eq!(g.into_inner(), vec![img.clone()]);

        let l = builder.laplacian_sequence(&img, 0).unwrap();
        assert_eq!(l.into_inner(), vec![img]);
    }

    #[test]
    fn test_levels_preserve_dimensions() {
        let img = checker(Shape::new(13, 9, 1));
        let builder = PyramidBuilder::default();
        let g = builder.gaussian_sequence(&img, 4).unwrap();
        let l = builder.laplacian_sequence(&img, 4).unwrap();
        for level in g.iter().chain(l.iter()) {
            assert_eq!(level.shape(), img.shape());
        }
    }

    #[test]
    fn test_gaussian_chain_blurs_previous_level() {
        let img = checker(Shape::new(10, 10, 3));
        let builder = PyramidBuilder::default();
        let g = builder.gaussian_sequence(&img, 3).unwrap();
        for i in 1..g.len() {
            let expected = builder.blur().apply(&g[i - 1]).unwrap();
            assert_eq!(g[i], expected);
        }
    }

    #[test]
    fn test_laplacian_recurrence() {
        let img = checker(Shape::new(10, 8, 3));
        let builder = PyramidBuilder::default();
        let g = builder.gaussian_sequence(&img, 3).unwrap();
        let l = builder.laplacian_sequence(&img, 3).unwrap();

        let mut running = img.clone();
        for i in 0..3 {
            let next = builder.blur().apply(&running).unwrap();
            assert_eq!(l[i], g[i].sub(&next).unwrap());
            running = next;
        }
        assert_eq!(l.low_pass(), &running);
    }

    #[test]
    fn test_collapse_reconstructs_input() {
        let img = checker(Shape::new(16, 12, 3));
        let builder = PyramidBuilder::default();
        for levels in [1, 2, 4, 6] {
            let rebuilt = builder.laplacian_sequence(&img, levels).unwrap().collapse().unwrap();
            for (a, b) in rebuilt.data().iter().zip(img.data()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_bands_are_unclamped() {
        let img = checker(Shape::new(8, 8, 1));
        let l = PyramidBuilder::default().laplacian_sequence(&img, 1).unwrap();
        assert!(l[0].data().iter().any(|&v| v < 0.0));
    }

    #[test]
    fn test_from_levels_rejects_mixed_shapes() {
        let levels = vec![
            Image::zeros(Shape::new(4, 4, 1)),
            Image::zeros(Shape::new(5, 4, 1)),
        ];
        assert!(matches!(
            GaussianSequence::from_levels(levels),
            Err(OpsError::SizeMismatch(_))
        ));
        assert!(matches!(
            LaplacianSequence::from_levels(Vec::new()),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_custom_config() {
        let config = PyramidConfig {
            kernel_size: 3,
            sigma: 1.0,
            border: BorderMode::Replicate,
        };
        let builder = PyramidBuilder::new(config).unwrap();
        assert_eq!(builder.blur().kernel().len(), 3);
        assert_eq!(builder.blur().border(), BorderMode::Replicate);

        let bad = PyramidConfig { kernel_size: 4, ..config };
        assert!(PyramidBuilder::new(bad).is_err());
    }
}
