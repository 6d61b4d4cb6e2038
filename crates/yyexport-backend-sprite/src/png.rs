//! Deterministic PNG reading and writing for frame images.
//!
//! Frame images are always written as 8-bit RGBA with fixed compression
//! settings, so converting the same sprite twice yields identical files.

use std::io::{Read, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Decoder, Encoder, FilterType, Transformations};
use thiserror::Error;

use crate::texture::TextureBuffer;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    Decoding(#[from] png::DecodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Unsupported color type: {0:?}")]
    UnsupportedColorType(ColorType),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGBA texture buffer to a PNG file.
pub fn write_rgba(buffer: &TextureBuffer, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    write_rgba_to_writer(buffer, writer, config)
}

/// Write an RGBA texture buffer to a writer.
pub fn write_rgba_to_writer<W: Write>(
    buffer: &TextureBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "cannot encode a {}x{} image",
            buffer.width, buffer.height
        )));
    }

    let mut encoder = Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.to_rgba8())?;

    Ok(())
}

/// Encode an RGBA texture buffer into memory.
pub fn write_rgba_to_vec(buffer: &TextureBuffer, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(buffer, &mut data, config)?;
    Ok(data)
}

/// Read a PNG file into an RGBA texture buffer.
pub fn read_rgba(path: &Path) -> Result<TextureBuffer, PngError> {
    let file = std::fs::File::open(path)?;
    read_rgba_from_reader(std::io::BufReader::new(file))
}

/// Decode a PNG stream into an RGBA texture buffer.
///
/// Palette, low bit depth and 16-bit images are normalized to 8-bit
/// channels first. Grayscale and RGB images become opaque.
pub fn read_rgba_from_reader<R: Read>(reader: R) -> Result<TextureBuffer, PngError> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match info.color_type {
        ColorType::Rgba => bytes.to_vec(),
        ColorType::Rgb => bytes
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        ColorType::Grayscale => bytes.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => return Err(PngError::UnsupportedColorType(other)),
    };

    TextureBuffer::from_rgba8(info.width, info.height, &rgba).ok_or_else(|| {
        PngError::InvalidDimensions(format!(
            "decoded {} bytes for a {}x{} image",
            rgba.len(),
            info.width,
            info.height
        ))
    })
}
