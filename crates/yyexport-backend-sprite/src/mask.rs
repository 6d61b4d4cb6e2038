//! Binary collision masks.
//!
//! A [`CollisionMask`] is an unpacked `width` x `height` grid of bits,
//! indexed row-major. Source masks arrive packed (one bit per pixel, MSB
//! first, rows padded to whole bytes) and are unpacked with
//! [`CollisionMask::from_packed`].

use yyexport_spec::{MaskData, MaskLayout, SourceSprite};

use crate::error::DimensionError;
use crate::texture::TextureBuffer;

/// A binary collision mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Create an empty (all clear) mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Create a mask by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Unpack source mask data of the given dimensions.
    pub fn from_packed(width: u32, height: u32, mask: &MaskData) -> Result<Self, DimensionError> {
        let expected =
            MaskData::packed_len(width, height).ok_or(DimensionError::TooLarge { width, height })?;
        if mask.data.len() != expected {
            return Err(DimensionError::MaskDataLength {
                width,
                height,
                expected,
                actual: mask.data.len(),
            });
        }
        let stride = MaskData::stride(width);
        Ok(Self::from_fn(width, height, |x, y| {
            let byte = mask.data[y as usize * stride + x as usize / 8];
            byte & (0x80 >> (x % 8)) != 0
        }))
    }

    /// Derive a mask from an image: a pixel is set when it is mostly opaque
    /// and bright.
    pub fn from_texture(image: &TextureBuffer) -> Self {
        Self::from_fn(image.width, image.height, |x, y| {
            let c = image.get(x, y);
            c.a >= 0.5 && c.luminance() >= 0.5
        })
    }

    /// Pack the mask back into source format.
    pub fn to_packed(&self) -> MaskData {
        MaskData::from_bits(self.width, self.height, &self.bits)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is set. Out-of-range pixels are clear.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.bits[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// Number of set pixels.
    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Dimensions of the stored collision masks of a sprite.
///
/// Full-image masks cover the whole sprite canvas. Bounding-box masks cover
/// only the inclusive margin rectangle.
pub fn compute_mask_dimensions(sprite: &SourceSprite) -> Result<(u32, u32), DimensionError> {
    let (width, height) = match sprite.mask_layout {
        MaskLayout::FullImage => (sprite.width, sprite.height),
        MaskLayout::BoundingBox => {
            let (l, r, t, b) = (
                sprite.margin_left,
                sprite.margin_right,
                sprite.margin_top,
                sprite.margin_bottom,
            );
            if r < l || b < t {
                return Err(DimensionError::InvertedBoundingBox {
                    left: l,
                    right: r,
                    top: t,
                    bottom: b,
                });
            }
            let width = u32::try_from(i64::from(r) - i64::from(l) + 1)
                .map_err(|_| DimensionError::TooLarge { width: u32::MAX, height: 0 })?;
            let height = u32::try_from(i64::from(b) - i64::from(t) + 1)
                .map_err(|_| DimensionError::TooLarge { width, height: u32::MAX })?;
            (width, height)
        }
    };
    if width == 0 || height == 0 {
        return Err(DimensionError::EmptyMask { width, height });
    }
    MaskData::packed_len(width, height).ok_or(DimensionError::TooLarge { width, height })?;
    Ok((width, height))
}

/// Mean absolute per-pixel difference of two equally sized masks, in [0, 1].
pub fn mean_absolute_difference(
    a: &CollisionMask,
    b: &CollisionMask,
) -> Result<f64, DimensionError> {
    if a.width != b.width || a.height != b.height {
        return Err(DimensionError::MismatchedMasks(
            a.width, a.height, b.width, b.height,
        ));
    }
    if a.bits.is_empty() {
        return Ok(0.0);
    }
    let differing = a.bits.iter().zip(&b.bits).filter(|(x, y)| x != y).count();
    Ok(differing as f64 / a.bits.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_packed_msb_first() {
        // 10 pixels wide: two bytes per row.
        let data = MaskData::new(vec![0b1000_0001, 0b0100_0000, 0, 0]);
        let mask = CollisionMask::from_packed(10, 2, &data).unwrap();
        assert!(mask.get(0, 0));
        assert!(mask.get(7, 0));
        assert!(mask.get(9, 0));
        assert!(!mask.get(8, 0));
        assert_eq!(mask.count_set(), 3);
    }

    #[test]
    fn test_packed_roundtrip() {
        let mask = CollisionMask::from_fn(11, 5, |x, y| (x + y) % 3 == 0);
        let packed = mask.to_packed();
        assert_eq!(CollisionMask::from_packed(11, 5, &packed).unwrap(), mask);
    }

    #[test]
    fn test_from_packed_wrong_length() {
        let data = MaskData::new(vec![0; 3]);
        assert_eq!(
            CollisionMask::from_packed(8, 4, &data),
            Err(DimensionError::MaskDataLength {
                width: 8,
                height: 4,
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_dimensions_full_image() {
        let sprite = SourceSprite::new("spr", 40, 20).with_margins(5, 10, 5, 10);
        assert_eq!(compute_mask_dimensions(&sprite), Ok((40, 20)));
    }

    #[test]
    fn test_dimensions_bounding_box() {
        let sprite = SourceSprite::new("spr", 40, 20)
            .with_margins(5, 10, 2, 7)
            .with_mask_layout(MaskLayout::BoundingBox);
        assert_eq!(compute_mask_dimensions(&sprite), Ok((6, 6)));
    }

    #[test]
    fn test_dimensions_inverted_box() {
        let sprite = SourceSprite::new("spr", 40, 20)
            .with_margins(10, 5, 0, 7)
            .with_mask_layout(MaskLayout::BoundingBox);
        assert!(matches!(
            compute_mask_dimensions(&sprite),
            Err(DimensionError::InvertedBoundingBox { .. })
        ));
    }

    #[test]
    fn test_dimensions_zero_size_sprite() {
        let sprite = SourceSprite::new("spr", 0, 16);
        assert_eq!(
            compute_mask_dimensions(&sprite),
            Err(DimensionError::EmptyMask {
                width: 0,
                height: 16
            })
        );
    }

    #[test]
    fn test_mean_absolute_difference() {
        let a = CollisionMask::from_fn(4, 4, |x, _| x < 2);
        let b = CollisionMask::from_fn(4, 4, |x, _| x < 3);
        assert_eq!(mean_absolute_difference(&a, &b), Ok(0.25));
        assert_eq!(mean_absolute_difference(&a, &a), Ok(0.0));
    }

    #[test]
    fn test_mean_absolute_difference_size_mismatch() {
        let a = CollisionMask::new(4, 4);
        let b = CollisionMask::new(4, 5);
        assert_eq!(
            mean_absolute_difference(&a, &b),
            Err(DimensionError::MismatchedMasks(4, 4, 4, 5))
        );
    }
}
