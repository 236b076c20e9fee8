//! # lapblend-io
//!
//! Image decode and encode for lapblend.
//!
//! - **PNG** - 8 and 16 bit, gray/RGB with or without alpha
//! - **JPEG** - 8 bit gray/RGB (CMYK is converted on read)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lapblend_io::{read_image, write_image, ReadMode};
//!
//! // Color sources and a grayscale mask
//! let a = read_image("a.png", ReadMode::Color)?;
//! let mask = read_image("mask.png", ReadMode::Grayscale)?;
//!
//! // Samples are clamped to [0, 1] and scaled to 8 bit on write
//! write_image("blended.png", &a)?;
//! ```
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod convert;
mod detect;
mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use convert::{from_image, luma, read_image, to_image, write_image, ReadMode};
pub use detect::Format;
pub use error::{IoError, IoResult};

use std::path::Path;

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is not
/// supported, or the data is corrupted.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    tracing::trace!(path = %path.display(), format = format.name(), "read");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        _ => Err(unsupported(path)),
    }
}

/// Writes an image to a file, choosing the format from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created or the format is not
/// supported for writing.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    tracing::trace!(path = %path.display(), format = format.name(), "write");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::write(path, image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, image),

        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

/// Format-agnostic decoded pixels.
///
/// Channels are interleaved: 1 (gray), 2 (gray + alpha), 3 (RGB) or
/// 4 (RGBA).
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of interleaved channels.
    pub channels: u32,
    /// Pixel data format.
    pub format: PixelFormat,
    /// Raw pixel data.
    pub data: PixelData,
}

/// Pixel data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit unsigned integer per channel.
    U8,
    /// 16-bit unsigned integer per channel.
    U16,
    /// 32-bit float per channel.
    F32,
}

/// Raw pixel data storage.
#[derive(Debug, Clone)]
pub enum PixelData {
    /// 8-bit unsigned data.
    U8(Vec<u8>),
    /// 16-bit unsigned data.
    U16(Vec<u16>),
    /// 32-bit float data.
    F32(Vec<f32>),
}

impl ImageData {
    /// Creates ImageData from f32 pixel data.
    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::F32,
            data: PixelData::F32(data),
        }
    }

    /// Creates ImageData from u8 pixel data.
    pub fn from_u8(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::U8,
            data: PixelData::U8(data),
        }
    }

    /// Creates ImageData from u16 pixel data.
    pub fn from_u16(width: u32, height: u32, channels: u32, data: Vec<u16>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::U16,
            data: PixelData::U16(data),
        }
    }

    /// Returns the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the total number of samples (pixels * channels).
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// Converts pixel data to f32, mapping the native integer range to [0, 1].
    pub fn to_f32(&self) -> Vec<f32> {
        match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as f32 / 255.0).collect(),
            PixelData::U16(data) => data.iter().map(|&v| v as f32 / 65535.0).collect(),
            PixelData::F32(data) => data.clone(),
        }
    }

    /// Converts pixel data to u8 for saving.
    ///
    /// Float samples are clamped to [0, 1], scaled by 255 and rounded, so
    /// out-of-range values saturate instead of wrapping.
    pub fn to_u8(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(data) => data.clone(),
            PixelData::U16(data) => data.iter().map(|&v| (v >> 8) as u8).collect(),
            PixelData::F32(data) => data.iter().map(|&v| float_to_u8(v)).collect(),
        }
    }
}

#[inline]
fn float_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u8_saturates() {
        let img = ImageData::from_f32(5, 1, 1, vec![-0.3, 0.0, 0.5, 1.0, 1.7]);
        assert_eq!(img.to_u8(), vec![0, 0, 128, 255, 255]);
    }

    #[test]
    fn test_to_u8_nan_is_black() {
        let img = ImageData::from_f32(1, 1, 1, vec![f32::NAN]);
        assert_eq!(img.to_u8(), vec![0]);
    }

    #[test]
    fn test_to_f32_native_ranges() {
        let img = ImageData::from_u8(2, 1, 1, vec![0, 255]);
        assert_eq!(img.to_f32(), vec![0.0, 1.0]);

        let img = ImageData::from_u16(2, 1, 1, vec![0, 65535]);
        assert_eq!(img.to_f32(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_unknown_extension_write() {
        let img = ImageData::from_u8(1, 1, 1, vec![0]);
        let err = write("out.bmp", &img).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat(ref e) if e == "bmp"));
    }

    #[test]
    fn test_missing_file_read() {
        let err = read("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }
}
