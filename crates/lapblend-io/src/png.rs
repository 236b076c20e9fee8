//! PNG format support.
//!
//! Reads 8 and 16 bit grayscale, grayscale+alpha, RGB and RGBA files.
//! Palette and sub-byte images are expanded to 8 bit on read. Writing
//! always produces 8-bit output.
//!
//! # Example
//!
//! ```rust,ignore
//! use lapblend_io::png::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```

use crate::{ImageData, IoError, IoResult};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::DecodeError(format!(
                "unexpanded color type {:?}",
                other
            )));
        }
    };

    let image = match info.bit_depth {
        png::BitDepth::Eight => ImageData::from_u8(info.width, info.height, channels, bytes.to_vec()),
        png::BitDepth::Sixteen => {
            ImageData::from_u16(info.width, info.height, channels, bytes_to_u16(bytes))
        }
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, other
            )));
        }
    };
    Ok(image)
}

/// Writes an image to a PNG file.
///
/// Converts to 8-bit if necessary.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let color_type = match image.channels {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    let u8_data = image.to_u8();
    png_writer
        .write_image_data(&u8_data)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

/// Converts big-endian byte slice to u16 vector.
fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelData;

    #[test]
    fn test_roundtrip_rgb() {
        let width = 32;
        let height = 16;
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 8) as u8);
                data.push((y * 16) as u8);
                data.push(128);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        write(&path, &ImageData::from_u8(width, height, 3, data.clone())).unwrap();

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.width, width);
        assert_eq!(loaded.height, height);
        assert_eq!(loaded.channels, 3);
        match loaded.data {
            PixelData::U8(pixels) => assert_eq!(pixels, data),
            other => panic!("unexpected pixel data {:?}", other),
        }
    }

    #[test]
    fn test_grayscale_keeps_one_channel() {
        let data: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        write(&path, &ImageData::from_u8(8, 8, 1, data)).unwrap();

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.channels, 1);
        assert_eq!(loaded.sample_count(), 64);
    }

    #[test]
    fn test_float_write_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.png");
        let img = ImageData::from_f32(3, 1, 1, vec![-1.0, 0.5, 2.0]);
        write(&path, &img).unwrap();

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.to_u8(), vec![0, 128, 255]);
    }

    #[test]
    fn test_rejects_five_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let img = ImageData::from_u8(1, 1, 5, vec![0; 5]);
        assert!(matches!(write(&path, &img), Err(IoError::EncodeError(_))));
    }
}
