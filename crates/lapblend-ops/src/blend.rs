//! One-call Laplacian pyramid blend of two images under a mask.
//!
//! [`pyramid_blend`] runs the whole data flow: validate, normalize, build a
//! Laplacian sequence for each source and a Gaussian sequence for the mask,
//! then composite and collapse. Shape errors are reported before any image
//! is normalized or blurred.

use crate::composite::Compositor;
use crate::pyramid::{PyramidBuilder, PyramidConfig};
use crate::{OpsError, OpsResult};
use lapblend_core::{normalize_with_outcome, Image, NormalizeOutcome};
use tracing::{debug, info, warn};

/// Parameters for [`pyramid_blend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendConfig {
    /// Number of blur/residual steps. The sequences hold `levels + 1` images.
    pub levels: usize,
    /// Blur parameters.
    pub pyramid: PyramidConfig,
}

impl BlendConfig {
    /// Default blur with the given level count.
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            pyramid: PyramidConfig::default(),
        }
    }

    /// Replaces the blur parameters.
    pub fn with_pyramid(mut self, pyramid: PyramidConfig) -> Self {
        self.pyramid = pyramid;
        self
    }
}

/// Checks that `a`, `b` and `mask` can be blended together.
///
/// `a` and `b` must have identical shapes with 1 or 3 channels; `mask` must
/// be single-channel and cover the same pixel grid.
pub fn validate_inputs(a: &Image, b: &Image, mask: &Image) -> OpsResult<()> {
    a.shape().validate()?;
    if !matches!(a.channels(), 1 | 3) {
        return Err(lapblend_core::Error::UnsupportedChannels(a.channels()).into());
    }
    if a.shape() != b.shape() {
        return Err(OpsError::SizeMismatch(format!(
            "image A is {}, image B is {}",
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
            "mask is {}x{}, images are {}x{}",
            mask.width(),
            mask.height(),
            a.width(),
            a.height()
        )));
    }
    Ok(())
}

fn normalize_input(name: &'static str, image: &Image) -> Image {
    let (out, outcome) = normalize_with_outcome(image);
    match outcome {
        NormalizeOutcome::Rescaled { min, max } => debug!(input = name, min, max, "normalized"),
        NormalizeOutcome::Clamped => {
            warn!(input = name, "input is constant, keeping its value clamped to [0, 1]")
        }
    }
    out
}

/// Blends `a` and `b` guided by `mask`.
///
/// Every input is min/max normalized first. The result is the sum of the
/// blended bands; it is not clamped, so values can fall slightly outside
/// `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use lapblend_core::{Image, Shape};
/// use lapblend_ops::blend::{pyramid_blend, BlendConfig};
///
/// let a = Image::filled(Shape::new(8, 8, 3), 1.0);
/// let b = Image::filled(Shape::new(8, 8, 3), 0.0);
/// let m = Image::from_fn(Shape::new(8, 8, 1), |x, _, _| if x < 4 { 1.0 } else { 0.0 });
///
/// let out = pyramid_blend(&a, &b, &m, &BlendConfig::new(2)).unwrap();
/// assert!(out.get(0, 0, 0) > 0.85);
/// assert!(out.get(7, 0, 0) < 0.15);
/// ```
pub fn pyramid_blend(a: &Image, b: &Image, mask: &Image, config: &BlendConfig) -> OpsResult<Image> {
    validate_inputs(a, b, mask)?;
    let builder = PyramidBuilder::new(config.pyramid)?;
    let levels = config.levels;

    info!(
        shape = %a.shape(),
        levels,
        kernel = config.pyramid.kernel_size,
        sigma = config.pyramid.sigma,
        border = config.pyramid.border.name(),
        "pyramid blend"
    );

    let a = normalize_input("A", a);
    let b = normalize_input("B", b);
    let mask = normalize_input("mask", mask);

    let la = builder.laplacian_sequence(&a, levels)?;
    let lb = builder.laplacian_sequence(&b, levels)?;
    let gm = builder.gaussian_sequence(&mask, levels)?;

    Compositor::blend(&la, &lb, &gm, levels)
}
