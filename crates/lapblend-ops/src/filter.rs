//! Separable Gaussian blur with reflective border handling.
//!
//! The blur used by every pyramid level is a fixed-size 1D kernel applied
//! along rows, then along columns. Out-of-range taps are mapped back into
//! the image by a [`BorderMode`]; zero padding is not offered because it
//! darkens the image edges at every level.
//!
//! # Example
//!
//! ```rust
//! use lapblend_core::{Image, Shape};
//! use lapblend_ops::filter::{BorderMode, GaussianBlur};
//!
//! let src = Image::filled(Shape::new(16, 16, 3), 0.5);
//! let blur = GaussianBlur::new(5, 4.0, BorderMode::Reflect101).unwrap();
//! let blurred = blur.apply(&src).unwrap();
//! assert_eq!(blurred.shape(), src.shape());
//! ```

use crate::{OpsError, OpsResult};
use lapblend_core::Image;
use tracing::trace;

/// Images with at least this many pixels take the rayon path.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_PIXELS: usize = 64 * 64;

/// How taps that fall outside the image are mapped back inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Mirror without repeating the edge sample: `gfedcb|abcdefgh|gfedcba`.
    #[default]
    Reflect101,
    /// Repeat the edge sample: `aaaaaa|abcdefgh|hhhhhhh`.
    Replicate,
    /// Mirror including the edge sample: `fedcba|abcdefgh|hgfedcb`.
    Reflect,
}

impl BorderMode {
    /// Maps a possibly out-of-range index `i` onto `0..len`.
    ///
    /// `len` must be non-zero.
    ///
    /// ```rust
    /// use lapblend_ops::filter::BorderMode;
    ///
    /// assert_eq!(BorderMode::Reflect101.map_index(-1, 5), 1);
    /// assert_eq!(BorderMode::Replicate.map_index(-1, 5), 0);
    /// assert_eq!(BorderMode::Reflect.map_index(-1, 5), 0);
    /// ```
    pub fn map_index(self, i: isize, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        match self {
            Self::Replicate => i.clamp(0, len as isize - 1) as usize,
            Self::Reflect101 => {
                let period = (2 * len - 2) as isize;
                let r = i.rem_euclid(period) as usize;
                if r < len { r } else { 2 * len - 2 - r }
            }
            Self::Reflect => {
                let period = (2 * len) as isize;
                let r = i.rem_euclid(period) as usize;
                if r < len { r } else { 2 * len - 1 - r }
            }
        }
    }

    /// Short lowercase name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Reflect101 => "reflect101",
            Self::Replicate => "replicate",
            Self::Reflect => "reflect",
        }
    }
}

/// Odd-length 1D convolution kernel, applied separably.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1D {
    weights: Vec<f32>,
}

impl Kernel1D {
    /// Creates a kernel from explicit weights.
    ///
    /// The length must be odd and every weight finite.
    pub fn new(weights: Vec<f32>) -> OpsResult<Self> {
        if weights.is_empty() || weights.len() % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "kernel length must be odd, got {}",
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(OpsError::InvalidParameter(
                "kernel weights must be finite".into(),
            ));
        }
        Ok(Self { weights })
    }

    /// Creates a normalized Gaussian kernel.
    ///
    /// Weights are `exp(-(i - r)^2 / (2 sigma^2))` for `i` in `0..size`,
    /// scaled to sum to one. A non-positive `sigma` is derived from the size
    /// as `0.3 * ((size - 1) * 0.5 - 1) + 0.8`; for sizes up to 7 the
    /// binomial approximations are used instead.
    ///
    /// ```rust
    /// use lapblend_ops::filter::Kernel1D;
    ///
    /// let k = Kernel1D::gaussian(5, 0.0).unwrap();
    /// assert_eq!(k.weights(), &[0.0625, 0.25, 0.375, 0.25, 0.0625]);
    /// ```
    pub fn gaussian(size: usize, sigma: f32) -> OpsResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian kernel size must be odd, got {}",
                size
            )));
        }
        if sigma.is_nan() || sigma.is_infinite() {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian sigma must be finite, got {}",
                sigma
            )));
        }
        Ok(Self {
            weights: gaussian_weights(size, sigma),
        })
    }

    /// Kernel weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Number of taps.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false; kernels hold at least one tap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Taps on each side of the center.
    #[inline]
    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }
}

fn gaussian_weights(size: usize, sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        match size {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
            7 => {
                return vec![
                    0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
                ];
            }
            _ => {}
        }
    }

    let sigma = if sigma > 0.0 {
        sigma as f64
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let scale = -0.5 / (sigma * sigma);
    let center = (size as f64 - 1.0) * 0.5;

    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();

    raw.iter().map(|w| (w / sum) as f32).collect()
}

/// Separable Gaussian low-pass filter.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBlur {
    kernel: Kernel1D,
    border: BorderMode,
}

impl GaussianBlur {
    /// Creates a blur with a `size`-tap Gaussian of the given sigma.
    pub fn new(size: usize, sigma: f32, border: BorderMode) -> OpsResult<Self> {
        Ok(Self {
            kernel: Kernel1D::gaussian(size, sigma)?,
            border,
        })
    }

    /// Creates a blur from an arbitrary separable kernel.
    pub fn with_kernel(kernel: Kernel1D, border: BorderMode) -> Self {
        Self { kernel, border }
    }

    /// The 1D kernel applied along both axes.
    pub fn kernel(&self) -> &Kernel1D {
        &self.kernel
    }

    /// Border handling mode.
    pub fn border(&self) -> BorderMode {
        self.border
    }

    /// Blurs `src` into a new image of the same shape.
    ///
    /// Large images are processed on the rayon pool when the `parallel`
    /// feature is enabled; the result is bit-identical either way.
    pub fn apply(&self, src: &Image) -> OpsResult<Image> {
        trace!(
            width = src.width(),
            height = src.height(),
            channels = src.channels(),
            taps = self.kernel.len(),
            "gaussian_blur"
        );

        #[cfg(feature = "parallel")]
        if src.shape().pixel_count() >= PARALLEL_MIN_PIXELS {
            return crate::parallel::convolve_separable(src, &self.kernel, self.border);
        }

        convolve_separable(src, &self.kernel, self.border)
    }
}

impl Default for GaussianBlur {
    /// 5-tap Gaussian, sigma 4.0, reflect-101 border.
    fn default() -> Self {
        Self {
            kernel: Kernel1D {
                weights: gaussian_weights(
                    crate::pyramid::DEFAULT_KERNEL_SIZE,
                    crate::pyramid::DEFAULT_SIGMA,
                ),
            },
            border: BorderMode::default(),
        }
    }
}

/// Applies `kernel` along rows, then columns, on the current thread.
///
/// # Example
///
/// ```rust
/// use lapblend_core::{Image, Shape};
/// use lapblend_ops::filter::{convolve_separable, BorderMode, Kernel1D};
///
/// let src = Image::filled(Shape::new(8, 8, 1), 0.25);
/// let k = Kernel1D::gaussian(3, 1.0).unwrap();
/// let out = convolve_separable(&src, &k, BorderMode::Replicate).unwrap();
/// assert!((out.get(0, 0, 0) - 0.25).abs() < 1e-6);
/// ```
pub fn convolve_separable(src: &Image, kernel: &Kernel1D, border: BorderMode) -> OpsResult<Image> {
    let shape = src.shape();
    shape.validate()?;

    let stride = shape.width * shape.channels;
    let x_table = index_table(shape.width, kernel.radius(), border);
    let y_table = index_table(shape.height, kernel.radius(), border);

    let mut temp = vec![0.0f32; shape.sample_count()];
    for (dst, row) in temp.chunks_mut(stride).zip(src.data().chunks(stride)) {
        convolve_row_horizontal(row, dst, shape.channels, kernel.weights(), &x_table);
    }

    let mut out = vec![0.0f32; shape.sample_count()];
    for (y, dst) in out.chunks_mut(stride).enumerate() {
        convolve_row_vertical(&temp, dst, y, kernel.weights(), &y_table);
    }

    Ok(Image::from_vec(shape.width, shape.height, shape.channels, out)?)
}

/// Source index for every padded position `-radius..len + radius`.
pub(crate) fn index_table(len: usize, radius: usize, border: BorderMode) -> Vec<usize> {
    (0..len + 2 * radius)
        .map(|j| border.map_index(j as isize - radius as isize, len))
        .collect()
}

/// Horizontal pass over one row.
pub(crate) fn convolve_row_horizontal(
    src_row: &[f32],
    dst_row: &mut [f32],
    channels: usize,
    weights: &[f32],
    x_table: &[usize],
) {
    let width = dst_row.len() / channels;
    for x in 0..width {
        let taps = &x_table[x..x + weights.len()];
        for c in 0..channels {
            let mut sum = 0.0f32;
            for (&sx, &w) in taps.iter().zip(weights) {
                sum += src_row[sx * channels + c] * w;
            }
            dst_row[x * channels + c] = sum;
        }
    }
}

/// Vertical pass producing output row `y`.
pub(crate) fn convolve_row_vertical(
    src: &[f32],
    dst_row: &mut [f32],
    y: usize,
    weights: &[f32],
    y_table: &[usize],
) {
    let stride = dst_row.len();
    let taps = &y_table[y..y + weights.len()];
    for (i, out) in dst_row.iter_mut().enumerate() {
        let mut sum = 0.0f32;
        for (&sy, &w) in taps.iter().zip(weights) {
            sum += src[sy * stride + i] * w;
        }
        *out = sum;
    }
}
