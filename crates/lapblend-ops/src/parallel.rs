//! Parallel separable convolution using Rayon.
//!
//! Both passes split the output into rows and hand each row to the same
//! per-row kernels the sequential path uses, so every sample is summed in
//! the same order and the output matches [`crate::filter::convolve_separable`]
//! bit for bit.
//!
//! # Example
//!
//! ```rust
//! use lapblend_core::{Image, Shape};
//! use lapblend_ops::filter::{BorderMode, Kernel1D};
//! use lapblend_ops::parallel;
//!
//! let src = Image::filled(Shape::new(256, 256, 3), 0.5);
//! let k = Kernel1D::gaussian(5, 4.0).unwrap();
//! let blurred = parallel::convolve_separable(&src, &k, BorderMode::Reflect101).unwrap();
//! assert_eq!(blurred.shape(), src.shape());
//! ```

use crate::filter::{convolve_row_horizontal, convolve_row_vertical, index_table, BorderMode, Kernel1D};
use crate::OpsResult;
use lapblend_core::Image;
use rayon::prelude::*;

/// Row-parallel version of [`crate::filter::convolve_separable`].
pub fn convolve_separable(src: &Image, kernel: &Kernel1D, border: BorderMode) -> OpsResult<Image> {
    let shape = src.shape();
    shape.validate()?;

    let stride = shape.width * shape.channels;
    let x_table = index_table(shape.width, kernel.radius(), border);
    let y_table = index_table(shape.height, kernel.radius(), border);
    let weights = kernel.weights();

    let mut temp = vec![0.0f32; shape.sample_count()];
    temp.par_chunks_mut(stride)
        .zip(src.data().par_chunks(stride))
        .for_each(|(dst, row)| {
            convolve_row_horizontal(row, dst, shape.channels, weights, &x_table);
        });

    let mut out = vec![0.0f32; shape.sample_count()];
    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| {
            convolve_row_vertical(&temp, dst, y, weights, &y_table);
        });

    Ok(Image::from_vec(shape.width, shape.height, shape.channels, out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use lapblend_core::Shape;

    fn noise_image(shape: Shape) -> Image {
        // Deterministic pseudo-random pattern.
        Image::from_fn(shape, |x, y, c| {
            let h = (x as u32).wrapping_mul(73_856_093)
                ^ (y as u32).wrapping_mul(19_349_663)
                ^ (c as u32).wrapping_mul(83_492_791);
            (h % 1000) as f32 / 999.0
        })
    }

    #[test]
    fn test_matches_sequential_bitwise() {
        let src = noise_image(Shape::new(97, 61, 3));
        let k = Kernel1D::gaussian(5, 4.0).unwrap();
        for border in [BorderMode::Reflect101, BorderMode::Replicate, BorderMode::Reflect] {
            let seq = filter::convolve_separable(&src, &k, border).unwrap();
            let par = convolve_separable(&src, &k, border).unwrap();
            assert_eq!(seq.data(), par.data());
        }
    }

    #[test]
    fn test_single_channel_mask() {
        let src = noise_image(Shape::new(128, 80, 1));
        let k = Kernel1D::gaussian(5, 4.0).unwrap();
        let seq = filter::convolve_separable(&src, &k, BorderMode::Reflect101).unwrap();
        let par = convolve_separable(&src, &k, BorderMode::Reflect101).unwrap();
        assert_eq!(seq, par);
    }
}
