//! Min/max normalization applied once to every input before pyramid math.
//!
//! Sample values are linearly rescaled so that the smallest sample becomes
//! `0.0` and the largest becomes `1.0`.
//!
//! # Constant images
//!
//! When every sample has the same value the rescale divides by zero. In that
//! case the image is treated as already normalized: each sample is clamped to
//! `[0, 1]` and returned. A solid white input (1.0) therefore stays white and
//! a solid black input (0.0) stays black. The same fallback applies when the
//! range is not finite. NaN samples always map to `0.0`.
//!
//! ```rust
//! use lapblend_core::{Image, Shape, normalize};
//!
//! let img = Image::from_vec(3, 1, 1, vec![2.0, 4.0, 6.0]).unwrap();
//! let n = normalize(&img);
//! assert_eq!(n.data(), &[0.0, 0.5, 1.0]);
//!
//! let flat = Image::filled(Shape::new(2, 2, 1), 3.0);
//! assert!(normalize(&flat).data().iter().all(|&v| v == 1.0));
//! ```

use crate::image::Image;

/// How [`normalize`] treated an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeOutcome {
    /// Linear rescale from `[min, max]` to `[0, 1]`.
    Rescaled {
        /// Smallest input sample
        min: f32,
        /// Largest input sample
        max: f32,
    },
    /// Range was zero or not finite; samples were clamped to `[0, 1]`.
    Clamped,
}

/// Rescales `image` to `[0, 1]` using its own min and max.
pub fn normalize(image: &Image) -> Image {
    normalize_with_outcome(image).0
}

/// Like [`normalize`], also reporting which path was taken.
pub fn normalize_with_outcome(image: &Image) -> (Image, NormalizeOutcome) {
    match image.sample_range() {
        Some((min, max)) if (max - min).is_finite() && max - min > 0.0 => {
            let range = max - min;
            let out = image.map(move |v| if v.is_nan() { 0.0 } else { (v - min) / range });
            (out, NormalizeOutcome::Rescaled { min, max })
        }
        _ => {
            let out = image.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) });
            (out, NormalizeOutcome::Clamped)
        }
    }
}

impl Image {
    /// See [`normalize`].
    pub fn normalize(&self) -> Image {
        normalize(self)
    }
}
