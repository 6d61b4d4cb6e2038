//! In-memory frame images.

use yyexport_spec::TextureRef;

use crate::color::Color;
use crate::error::TextureError;

/// Source of frame images.
///
/// Implementations return the texture drawn onto its full bounding canvas,
/// i.e. a `bounding_width` x `bounding_height` image with the texture pixels
/// at (`target_x`, `target_y`). Resolvers are shared between worker threads.
pub trait TextureResolver: Sync {
    fn resolve(&self, texture: &TextureRef) -> Result<TextureBuffer, TextureError>;
}

/// An RGBA image with f64 color components.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Color>,
}

impl TextureBuffer {
    /// Create a new texture buffer filled with a color.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Create a fully transparent texture buffer.
    pub fn new_transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Color::transparent())
    }

    /// Build a buffer from tightly packed 8-bit RGBA bytes.
    ///
    /// Returns `None` when the byte count does not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        if bytes.len() != expected {
            return None;
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| Color::from_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.data[self.index(x, y)]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.data[idx] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    /// Scale to a new size with nearest-neighbour sampling.
    pub fn resize_nearest(&self, width: u32, height: u32) -> TextureBuffer {
        let mut out = TextureBuffer::new_transparent(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                out.set(x, y, self.get(sx, sy));
            }
        }
        out
    }

    /// Place this image on a new `width` x `height` canvas filled with
    /// `background`, with its top-left corner at (`offset_x`, `offset_y`).
    ///
    /// Pixels falling outside the canvas are dropped.
    pub fn extent(
        &self,
        width: u32,
        height: u32,
        offset_x: i64,
        offset_y: i64,
        background: Color,
    ) -> TextureBuffer {
        let mut out = TextureBuffer::new(width, height, background);
        for y in 0..self.height {
            let dy = offset_y + y as i64;
            if dy < 0 || dy >= height as i64 {
                continue;
            }
            for x in 0..self.width {
                let dx = offset_x + x as i64;
                if dx < 0 || dx >= width as i64 {
                    continue;
                }
                out.set(dx as u32, dy as u32, self.get(x, y));
            }
        }
        out
    }
}
