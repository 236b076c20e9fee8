//! # lapblend-core
//!
//! Core types for Laplacian pyramid blending.
//!
//! - [`Image`] - owned `f32` buffer with interleaved channels
//! - [`Shape`] - width, height and channel count of an image
//! - [`normalize`] - min/max rescale to `[0, 1]`, run once per input
//! - [`Error`] - failures shared by every lapblend crate
//!
//! ## Crate Structure
//!
//! ```text
//! lapblend-core (this crate)
//!    ^
//!    +-- lapblend-ops (blur, pyramids, compositing)
//!    +-- lapblend-io  (PNG/JPEG decode and encode)
//!    +-- lapblend-cli (the `lapblend` binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod normalize;

pub use error::{Error, Result};
pub use image::{Image, Shape};
pub use normalize::{normalize, normalize_with_outcome, NormalizeOutcome};
