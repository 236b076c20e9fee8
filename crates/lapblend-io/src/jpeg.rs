//! JPEG format support.
//!
//! Decoding keeps grayscale files single-channel and converts CMYK to RGB.
//! Encoding writes baseline 8-bit JPEG, grayscale for 1-channel input and
//! RGB otherwise (alpha is dropped).
//!
//! # Example
//!
//! ```rust,ignore
//! use lapblend_io::jpeg;
//!
//! let image = jpeg::read("photo.jpg")?;
//! jpeg::write_with_quality("out.jpg", &image, 95)?;
//! ```

use crate::{ImageData, IoError, IoResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 95;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let image = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => ImageData::from_u8(width, height, 3, pixels),
        jpeg_decoder::PixelFormat::L8 => ImageData::from_u8(width, height, 1, pixels),
        jpeg_decoder::PixelFormat::L16 => {
            let data = pixels
                .chunks_exact(2)
                .map(|l| u16::from_be_bytes([l[0], l[1]]))
                .collect();
            ImageData::from_u16(width, height, 1, data)
        }
        jpeg_decoder::PixelFormat::CMYK32 => {
            let rgb = pixels
                .chunks_exact(4)
                .flat_map(|cmyk| {
                    let k = 1.0 - cmyk[3] as f32 / 255.0;
                    let ch = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0).round() as u8;
                    [ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2])]
                })
                .collect();
            ImageData::from_u8(width, height, 3, rgb)
        }
    };
    Ok(image)
}

/// Writes an image to a JPEG file at [`DEFAULT_QUALITY`].
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    write_with_quality(path, image, DEFAULT_QUALITY)
}

/// Writes an image to a JPEG file at the given quality (1-100).
pub fn write_with_quality<P: AsRef<Path>>(path: P, image: &ImageData, quality: u8) -> IoResult<()> {
    use jpeg_encoder::{ColorType, Encoder};

    let width = u16::try_from(image.width)
        .map_err(|_| IoError::EncodeError(format!("width {} exceeds JPEG limit", image.width)))?;
    let height = u16::try_from(image.height)
        .map_err(|_| IoError::EncodeError(format!("height {} exceeds JPEG limit", image.height)))?;

    let u8_data = image.to_u8();
    let (color_type, pixels) = match image.channels {
        1 => (ColorType::Luma, u8_data),
        2 => (ColorType::Luma, u8_data.chunks_exact(2).map(|ga| ga[0]).collect()),
        3 => (ColorType::Rgb, u8_data),
        4 => (
            ColorType::Rgb,
            u8_data
                .chunks_exact(4)
                .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                .collect(),
        ),
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode(&pixels, width, height, color_type)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    std::fs::write(path.as_ref(), buffer)?;
    Ok(())
}
