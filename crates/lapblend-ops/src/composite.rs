//! Mask-weighted combination of two Laplacian sequences.
//!
//! Each band is mixed as `mask * a + (1 - mask) * b`, with the single-channel
//! mask level of the same index broadcast to every color channel. The blended
//! bands are then summed into the output image. The output is neither
//! clamped nor renormalized.
//!
//! # Example
//!
//! ```rust
//! use lapblend_core::{Image, Shape};
//! use lapblend_ops::composite::blend_band;
//!
//! let a = Image::filled(Shape::new(2, 2, 3), 1.0);
//! let b = Image::filled(Shape::new(2, 2, 3), 0.0);
//! let m = Image::filled(Shape::new(2, 2, 1), 0.25);
//! let out = blend_band(&a, &b, &m).unwrap();
//! assert_eq!(out.get(1, 1, 2), 0.25);
//! ```

use crate::pyramid::{GaussianSequence, LaplacianSequence};
use crate::{OpsError, OpsResult};
use lapblend_core::Image;
use tracing::{debug, trace};

/// Mixes one band of `a` and `b` weighted by a single-channel `mask`.
///
/// # Errors
///
/// - [`OpsError::SizeMismatch`] if `a` and `b` differ in shape, or the mask
///   covers a different pixel grid.
/// - [`OpsError::InvalidParameter`] if the mask has more than one channel.
pub fn blend_band(a: &Image, b: &Image, mask: &Image) -> OpsResult<Image> {
    check_band(a, b, mask)?;

    let channels = a.channels();
    let mut out = Image::zeros(a.shape());
    let samples = out
        .data_mut()
        .chunks_mut(channels)
        .zip(a.data().chunks(channels))
        .zip(b.data().chunks(channels))
        .zip(mask.data());

    for (((dst, pa), pb), &m) in samples {
        let inv = 1.0 - m;
        for c in 0..channels {
            dst[c] = m * pa[c] + inv * pb[c];
        }
    }
    Ok(out)
}

fn check_band(a: &Image, b: &Image, mask: &Image) -> OpsResult<()> {
    if a.shape() != b.shape() {
        return Err(OpsError::SizeMismatch(format!(
            "band A is {}, band B is {}",
            a.shape(),
            b.shape()
        )));
    }
    if mask.channels() != 1 {
        return Err(OpsError::InvalidParameter(format!(
            "mask must have 1 channel, got {}",
            mask.channels()
        )));
    }
    if !mask.shape().same_plane(&a.shape()) {
        return Err(OpsError::SizeMismatch(format!(
            "mask is {}x{}, bands are {}x{}",
            mask.width(),
            mask.height(),
            a.width(),
            a.height()
        )));
    }
    Ok(())
}

/// Combines two Laplacian sequences under a mask's Gaussian sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor;

impl Compositor {
    /// Checks sequence lengths and every level's shape before any arithmetic.
    pub fn validate(
        a: &LaplacianSequence,
        b: &LaplacianSequence,
        mask: &GaussianSequence,
        levels: usize,
    ) -> OpsResult<()> {
        let expected = levels + 1;
        for (what, actual) in [
            ("laplacian A", a.len()),
            ("laplacian B", b.len()),
            ("mask gaussian", mask.len()),
        ] {
            if actual != expected {
                return Err(OpsError::LevelMismatch { what, expected, actual });
            }
        }
        for ((la, lb), m) in a.iter().zip(b.iter()).zip(mask.iter()) {
            check_band(la, lb, m)?;
        }
        Ok(())
    }

    /// Blends every band: `mask[i] * a[i] + (1 - mask[i]) * b[i]`.
    pub fn composite_bands(
        a: &LaplacianSequence,
        b: &LaplacianSequence,
        mask: &GaussianSequence,
        levels: usize,
    ) -> OpsResult<LaplacianSequence> {
        Self::validate(a, b, mask, levels)?;
        trace!(levels, shape = %a.shape(), "composite_bands");

        let bands = a
            .iter()
            .zip(b.iter())
            .zip(mask.iter())
            .map(|((la, lb), m)| blend_band(la, lb, m))
            .collect::<OpsResult<Vec<_>>>()?;
        LaplacianSequence::from_levels(bands)
    }

    /// Blends every band and sums them into the output image.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lapblend_core::{Image, Shape};
    /// use lapblend_ops::composite::Compositor;
    /// use lapblend_ops::pyramid::PyramidBuilder;
    ///
    /// let builder = PyramidBuilder::default();
    /// let a = Image::filled(Shape::new(8, 8, 3), 1.0);
    /// let b = Image::filled(Shape::new(8, 8, 3), 0.0);
    /// let m = Image::filled(Shape::new(8, 8, 1), 1.0);
    ///
    /// let la = builder.laplacian_sequence(&a, 2).unwrap();
    /// let lb = builder.laplacian_sequence(&b, 2).unwrap();
    /// let gm = builder.gaussian_sequence(&m, 2).unwrap();
    ///
    /// let out = Compositor::blend(&la, &lb, &gm, 2).unwrap();
    /// assert!((out.get(4, 4, 0) - 1.0).abs() < 1e-5);
    /// ```
    pub fn blend(
        a: &LaplacianSequence,
        b: &LaplacianSequence,
        mask: &GaussianSequence,
        levels: usize,
    ) -> OpsResult<Image> {
        let bands = Self::composite_bands(a, b, mask, levels)?;
        debug!(bands = bands.len(), "collapsing blended bands");
        bands.collapse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pyramid::PyramidBuilder;
    use approx::assert_abs_diff_eq;
    use lapblend_core::Shape;

    fn gradient(shape: Shape, flip: bool) -> Image {
        Image::from_fn(shape, |x, y, c| {
            let v = (x + 2 * y + c) as f32 / (shape.width + 2 * shape.height + 3) as f32;
            if flip { 1.0 - v } else { v }
        })
    }

    fn constant_mask(shape: Shape, value: f32, levels: usize) -> GaussianSequence {
        let m = Image::filled(Shape::new(shape.width, shape.height, 1), value);
        GaussianSequence::from_levels(vec![m; levels + 1]).unwrap()
    }

    #[test]
    fn test_blend_band_broadcasts_mask() {
        let a = Image::filled(Shape::new(2, 1, 3), 0.8);
        let b = Image::filled(Shape::new(2, 1, 3), 0.2);
        let m = Image::from_vec(2, 1, 1, vec![1.0, 0.5]).unwrap();
        let out = blend_band(&a, &b, &m).unwrap();
        for c in 0..3 {
            assert_abs_diff_eq!(out.get(0, 0, c), 0.8, epsilon = 1e-6);
            assert_abs_diff_eq!(out.get(1, 0, c), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_blend_band_rejects_color_mask() {
        let a = Image::zeros(Shape::new(4, 4, 3));
        let m = Image::zeros(Shape::new(4, 4, 3));
        assert!(matches!(blend_band(&a, &a, &m), Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_blend_band_rejects_mask_size() {
        let a = Image::zeros(Shape::new(4, 4, 3));
        let m = Image::zeros(Shape::new(4, 5, 1));
        assert!(matches!(blend_band(&a, &a, &m), Err(OpsError::SizeMismatch(_))));
    }

    #[test]
    fn test_all_ones_mask_reproduces_a() {
        let shape = Shape::new(10, 8, 3);
        let builder = PyramidBuilder::default();
        let a = gradient(shape, false);
        let la = builder.laplacian_sequence(&a, 3).unwrap();
        let lb = builder.laplacian_sequence(&gradient(shape, true), 3).unwrap();
        let mask = constant_mask(shape, 1.0, 3);

        let bands = Compositor::composite_bands(&la, &lb, &mask, 3).unwrap();
        assert_eq!(bands, la);

        let out = Compositor::blend(&la, &lb, &mask, 3).unwrap();
        assert_eq!(out, la.collapse().unwrap());
        for (o, v) in out.data().iter().zip(a.data()) {
            assert_abs_diff_eq!(*o, *v, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_all_zeros_mask_reproduces_b() {
        let shape = Shape::new(9, 9, 3);
        let builder = PyramidBuilder::default();
        let b = gradient(shape, true);
        let la = builder.laplacian_sequence(&gradient(shape, false), 2).unwrap();
        let lb = builder.laplacian_sequence(&b, 2).unwrap();
        let mask = constant_mask(shape, 0.0, 2);

        let bands = Compositor::composite_bands(&la, &lb, &mask, 2).unwrap();
        assert_eq!(bands, lb);

        let out = Compositor::blend(&la, &lb, &mask, 2).unwrap();
        for (o, v) in out.data().iter().zip(b.data()) {
            assert_abs_diff_eq!(*o, *v, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_half_mask_is_mean() {
        let shape = Shape::new(6, 6, 3);
        let builder = PyramidBuilder::default();
        let a = gradient(shape, false);
        let b = gradient(shape, true);
        let la = builder.laplacian_sequence(&a, 1).unwrap();
        let lb = builder.laplacian_sequence(&b, 1).unwrap();
        let out = Compositor::blend(&la, &lb, &constant_mask(shape, 0.5, 1), 1).unwrap();
        for ((o, va), vb) in out.data().iter().zip(a.data()).zip(b.data()) {
            assert_abs_diff_eq!(*o, 0.5 * (va + vb), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_level_mismatch() {
        let shape = Shape::new(6, 6, 3);
        let builder = PyramidBuilder::default();
        let la = builder.laplacian_sequence(&gradient(shape, false), 2).unwrap();
        let lb = builder.laplacian_sequence(&gradient(shape, true), 1).unwrap();
        let mask = constant_mask(shape, 0.5, 2);

        let err = Compositor::blend(&la, &lb, &mask, 2).unwrap_err();
        assert!(matches!(
            err,
            OpsError::LevelMismatch { what: "laplacian B", expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_step_mask_scenario() {
        // White A, black B, mask left half 1.0 / right half 0.0, two levels.
        let shape = Shape::new(8, 8, 3);
        let builder = PyramidBuilder::default();
        let a = Image::filled(shape, 1.0);
        let b = Image::filled(shape, 0.0);
        let m = Image::from_fn(Shape::new(8, 8, 1), |x, _, _| if x < 4 { 1.0 } else { 0.0 });

        let la = builder.laplacian_sequence(&a, 2).unwrap();
        let lb = builder.laplacian_sequence(&b, 2).unwrap();
        let gm = builder.gaussian_sequence(&m, 2).unwrap();
        let out = Compositor::blend(&la, &lb, &gm, 2).unwrap();

        for y in 0..8 {
            assert!(out.get(0, y, 0) > 0.85);
            assert!(out.get(7, y, 0) < 0.15);
            for x in 1..8 {
                assert!(out.get(x, y, 1) <= out.get(x - 1, y, 1) + 1e-6);
            }
            for x in 0..8 {
                assert_abs_diff_eq!(out.get(x, y, 2) + out.get(7 - x, y, 2), 1.0, epsilon = 1e-5);
            }
        }
        // The transition spans the middle columns rather than a hard edge.
        assert!(out.get(3, 0, 0) < 0.95 && out.get(3, 0, 0) > 0.5);
        assert!(out.get(4, 0, 0) > 0.05 && out.get(4, 0, 0) < 0.5);
    }
}
