//! Conversion between decoded files and [`Image`] buffers.

use crate::{read, write, ImageData, IoError, IoResult};
use lapblend_core::{Image, Shape};
use std::path::Path;

/// BT.601 luma weights for R, G and B.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// How decoded channels are mapped into an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Three channels. Gray is replicated, alpha is dropped.
    #[default]
    Color,
    /// One channel. Color files are reduced to BT.601 luma.
    Grayscale,
}

/// BT.601 luma of an RGB triple.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}

/// Converts decoded pixels into an [`Image`] with values in `[0, 1]`.
pub fn to_image(data: &ImageData, mode: ReadMode) -> IoResult<Image> {
    let src_channels = data.channels as usize;
    if !(1..=4).contains(&src_channels) {
        return Err(lapblend_core::Error::UnsupportedChannels(src_channels).into());
    }

    let samples = data.to_f32();
    if samples.len() != data.sample_count() {
        return Err(lapblend_core::Error::DataSizeMismatch {
            expected: data.sample_count(),
            actual: samples.len(),
        }
        .into());
    }

    let pixels = samples.chunks_exact(src_channels);
    let out: Vec<f32> = match mode {
        ReadMode::Color => pixels
            .flat_map(|px| match src_channels {
                1 | 2 => [px[0]; 3],
                _ => [px[0], px[1], px[2]],
            })
            .collect(),
        ReadMode::Grayscale => pixels
            .map(|px| match src_channels {
                1 | 2 => px[0],
                _ => luma(px[0], px[1], px[2]),
            })
            .collect(),
    };

    let channels = match mode {
        ReadMode::Color => 3,
        ReadMode::Grayscale => 1,
    };
    Ok(Image::from_vec(
        data.width as usize,
        data.height as usize,
        channels,
        out,
    )?)
}

/// Wraps an [`Image`] as float [`ImageData`] ready for encoding.
pub fn from_image(image: &Image) -> IoResult<ImageData> {
    let Shape { width, height, channels } = image.shape();
    let dim = |v: usize, what: &str| {
        u32::try_from(v).map_err(|_| IoError::EncodeError(format!("{} {} too large", what, v)))
    };
    Ok(ImageData::from_f32(
        dim(width, "width")?,
        dim(height, "height")?,
        dim(channels, "channel count")?,
        image.data().to_vec(),
    ))
}

/// Reads a file and converts it per `mode`.
pub fn read_image<P: AsRef<Path>>(path: P, mode: ReadMode) -> IoResult<Image> {
    let data = read(path.as_ref())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        width = data.width,
        height = data.height,
        channels = data.channels,
        ?mode,
        "decoded"
    );
    to_image(&data, mode)
}

/// Writes an [`Image`] as 8-bit samples, clamping each value to `[0, 1]`.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    write(path, &from_image(image)?)
}
