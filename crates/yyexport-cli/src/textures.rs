//! File-backed texture resolution.

use std::path::PathBuf;
use yyexport_backend_sprite::png::{read_rgba, PngError};
use yyexport_backend_sprite::{Color, TextureBuffer, TextureError, TextureResolver};
use yyexport_spec::TextureRef;

/// Resolves texture keys as PNG paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileTextureResolver {
    root: PathBuf,
}

impl FileTextureResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureResolver for FileTextureResolver {
    fn resolve(&self, texture: &TextureRef) -> Result<TextureBuffer, TextureError> {
        let path = self.root.join(&texture.key);
        let image = read_rgba(&path).map_err(|e| match e {
            PngError::Io(source) if source.kind() == std::io::ErrorKind::NotFound => {
                TextureError::NotFound(path.display().to_string())
            }
            PngError::Io(source) => TextureError::Io {
                key: texture.key.clone(),
                source,
            },
            other => TextureError::Decode {
                key: texture.key.clone(),
                source: other,
            },
        })?;
        Ok(place_on_canvas(image, texture))
    }
}

/// Draw a texture item onto its bounding canvas at its target offset.
///
/// Without bounding information the item is its own canvas.
pub fn place_on_canvas(image: TextureBuffer, texture: &TextureRef) -> TextureBuffer {
    let width = if texture.bounding_width > 0 {
        texture.bounding_width
    } else {
        texture.target_x.saturating_add(image.width)
    };
    let height = if texture.bounding_height > 0 {
        texture.bounding_height
    } else {
        texture.target_y.saturating_add(image.height)
    };
    if width == image.width && height == image.height {
        return image;
    }
    image.extent(
        width,
        height,
        i64::from(texture.target_x),
        i64::from(texture.target_y),
        Color::transparent(),
    )
}
