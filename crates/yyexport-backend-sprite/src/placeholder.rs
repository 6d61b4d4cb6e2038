//! Images for frames whose texture is missing.

use crate::color::Color;
use crate::metadata::BoundingBox;
use crate::texture::TextureBuffer;

/// The 2x2 black and fuchsia checker stretched over missing frames.
pub fn missing_texture_pattern() -> TextureBuffer {
    let mut pattern = TextureBuffer::new(2, 2, Color::black());
    pattern.set(0, 0, Color::fuchsia());
    pattern.set(1, 1, Color::fuchsia());
    pattern
}

/// Placeholder image for a missing frame.
///
/// The checker is scaled to the bounding box, clipped to the sprite size.
/// When the box does not cover the whole sprite, it is placed at the box
/// position on a transparent canvas of the sprite size.
pub fn missing_texture_placeholder(width: u32, height: u32, bbox: &BoundingBox) -> TextureBuffer {
    let box_width = bbox.width().clamp(1, width.max(1));
    let box_height = bbox.height().clamp(1, height.max(1));
    let scaled = missing_texture_pattern().resize_nearest(box_width, box_height);
    if box_width == width && box_height == height {
        return scaled;
    }
    scaled.extent(
        width,
        height,
        i64::from(bbox.left),
        i64::from(bbox.top),
        Color::transparent(),
    )
}

/// Blank image used for missing frames when placeholders are disabled.
pub fn transparent_frame(width: u32, height: u32) -> TextureBuffer {
    TextureBuffer::new_transparent(width, height)
}
