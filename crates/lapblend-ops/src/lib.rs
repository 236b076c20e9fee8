//! # lapblend-ops
//!
//! Image operations behind Laplacian pyramid blending.
//!
//! # Modules
//!
//! - [`filter`] - Separable Gaussian blur and border handling
//! - [`pyramid`] - Gaussian and Laplacian sequences
//! - [`composite`] - Mask-weighted band mixing and reconstruction
//! - [`blend`] - The complete blend of two images under a mask
//!
//! # Example
//!
//! ```rust
//! use lapblend_core::{Image, Shape};
//! use lapblend_ops::{pyramid_blend, BlendConfig};
//!
//! let a = Image::filled(Shape::new(16, 16, 3), 0.9);
//! let b = Image::filled(Shape::new(16, 16, 3), 0.1);
//! let mask = Image::from_fn(Shape::new(16, 16, 1), |x, _, _| if x < 8 { 1.0 } else { 0.0 });
//!
//! let out = pyramid_blend(&a, &b, &mask, &BlendConfig::new(3)).unwrap();
//! assert_eq!(out.shape(), a.shape());
//! ```
//!
//! # Building blocks
//!
//! ```rust,ignore
//! use lapblend_ops::{Compositor, PyramidBuilder};
//!
//! let builder = PyramidBuilder::default();
//! let la = builder.laplacian_sequence(&a, levels)?;
//! let lb = builder.laplacian_sequence(&b, levels)?;
//! let gm = builder.gaussian_sequence(&mask, levels)?;
//! let out = Compositor::blend(&la, &lb, &gm, levels)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blend;
pub mod composite;
pub mod filter;
pub mod pyramid;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use blend::{pyramid_blend, BlendConfig};
pub use composite::Compositor;
pub use error::{OpsError, OpsResult};
pub use filter::{BorderMode, GaussianBlur};
pub use pyramid::{GaussianSequence, LaplacianSequence, PyramidBuilder, PyramidConfig};
