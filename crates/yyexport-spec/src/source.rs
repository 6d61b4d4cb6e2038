//! Source sprite model.
//!
//! These types describe sprites and tile-set backgrounds as they are stored in
//! compiled game data, before conversion. Coordinates are raw pixel values;
//! margins are inclusive on all four sides.

use serde::{Deserialize, Serialize};

use crate::record::coded_enum;

/// How collision masks are separated in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SepMaskType {
    /// Axis-aligned bounding box collision, no mask.
    #[default]
    None,
    /// Per-pixel collision mask(s).
    Precise,
    /// Rotated rectangle collision.
    RotatedRect,
}

/// Which extent a packed collision mask covers.
///
/// Older data stores masks at the full sprite size; newer data crops them to
/// the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaskLayout {
    /// Masks are `width x height`.
    #[default]
    FullImage,
    /// Masks are `(right - left + 1) x (bottom - top + 1)`.
    BoundingBox,
}

coded_enum! {
    /// Unit of the sequence playback speed.
    #[derive(Default)]
    pub enum PlaybackSpeedType {
        /// Frames per second.
        #[default]
        FramesPerSecond = 0,
        /// Frames per game frame.
        FramesPerGameFrame = 1,
    }
}

/// Reference to a texture page item.
///
/// The texture page lookup itself happens outside the converter; this carries
/// only what the converter needs to place the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextureRef {
    /// Key the texture resolver understands (a file path for the CLI).
    pub key: String,

    /// X offset of the item inside its bounding canvas.
    #[serde(default)]
    pub target_x: u32,

    /// Y offset of the item inside its bounding canvas.
    #[serde(default)]
    pub target_y: u32,

    /// Width of the item's pixel data (0 = use the decoded image width).
    #[serde(default)]
    pub target_width: u32,

    /// Height of the item's pixel data (0 = use the decoded image height).
    #[serde(default)]
    pub target_height: u32,

    /// Width of the bounding canvas (0 = same as the target).
    #[serde(default)]
    pub bounding_width: u32,

    /// Height of the bounding canvas (0 = same as the target).
    #[serde(default)]
    pub bounding_height: u32,
}

impl TextureRef {
    /// Creates a reference with no placement information.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target_x: 0,
            target_y: 0,
            target_width: 0,
            target_height: 0,
            bounding_width: 0,
            bounding_height: 0,
        }
    }

    /// Sets the target rectangle.
    pub fn with_target(mut self, x: u32, y: u32, width: u32, height: u32) -> Self {
        self.target_x = x;
        self.target_y = y;
        self.target_width = width;
        self.target_height = height;
        self
    }

    /// Sets the bounding canvas size.
    pub fn with_bounding(mut self, width: u32, height: u32) -> Self {
        self.bounding_width = width;
        self.bounding_height = height;
        self
    }
}

/// A packed 1-bit collision mask.
///
/// Rows are padded to whole bytes, most significant bit first. The mask's
/// width and height are not stored; they are computed from the owning sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskData {
    /// Packed bits.
    pub data: Vec<u8>,
}

impl MaskData {
    /// Wraps already packed bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Bytes per packed row.
    pub fn stride(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    /// Packed length for the given dimensions, `None` on overflow.
    pub fn packed_len(width: u32, height: u32) -> Option<usize> {
        Self::stride(width).checked_mul(height as usize)
    }

    /// Packs a row-major bit slice of `width * height` entries.
    ///
    /// Entries beyond `width * height` are ignored; missing entries are
    /// treated as clear.
    pub fn from_bits(width: u32, height: u32, bits: &[bool]) -> Self {
        let stride = Self::stride(width);
        let mut data = vec![0u8; stride * height as usize];
        for y in 0..height as usize {
            for x in 0..width as usize {
                if bits.get(y * width as usize + x).copied().unwrap_or(false) {
                    data[y * stride + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        Self { data }
    }
}

/// Nine-slice scaling data as stored in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceNineSlice {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    #[serde(default)]
    pub enabled: bool,
    /// Tile modes for left, top, right, bottom and centre.
    #[serde(default)]
    pub tile_modes: [u8; 5],
}

/// A sprite as stored in the game data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSprite {
    /// Sprite name; also the output resource name.
    pub name: String,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Origin X offset. May lie outside the canvas.
    #[serde(default)]
    pub origin_x: i32,

    /// Origin Y offset. May lie outside the canvas.
    #[serde(default)]
    pub origin_y: i32,

    /// Bounding box left edge (inclusive).
    pub margin_left: i32,

    /// Bounding box right edge (inclusive).
    pub margin_right: i32,

    /// Bounding box top edge (inclusive).
    pub margin_top: i32,

    /// Bounding box bottom edge (inclusive).
    pub margin_bottom: i32,

    /// Raw bounding box mode (0 = automatic, 1 = full image, 2 = manual).
    #[serde(default)]
    pub bbox_mode: u32,

    /// Collision mask separation mode.
    #[serde(default)]
    pub sep_masks: SepMaskType,

    /// Extent covered by each packed mask.
    #[serde(default)]
    pub mask_layout: MaskLayout,

    /// One slot per frame; `None` marks a missing texture.
    #[serde(default)]
    pub textures: Vec<Option<TextureRef>>,

    /// Zero, one shared, or one per frame.
    #[serde(default)]
    pub collision_masks: Vec<MaskData>,

    /// Sequence playback speed.
    #[serde(default = "default_playback_speed")]
    pub playback_speed: f32,

    /// Unit of `playback_speed`.
    #[serde(default)]
    pub playback_speed_type: PlaybackSpeedType,

    /// Nine-slice data, if the sprite has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nine_slice: Option<SourceNineSlice>,

    /// Texture group found by the texture page lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_group: Option<String>,

    /// Whether the sprite lives on its own texture page.
    #[serde(default)]
    pub separate_texture: bool,
}

fn default_playback_speed() -> f32 {
    30.0
}

impl SourceSprite {
    /// Creates a sprite whose bounding box covers the whole canvas.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            origin_x: 0,
            origin_y: 0,
            margin_left: 0,
            margin_right: i32::try_from(width.saturating_sub(1)).unwrap_or(i32::MAX),
            margin_top: 0,
            margin_bottom: i32::try_from(height.saturating_sub(1)).unwrap_or(i32::MAX),
            bbox_mode: 0,
            sep_masks: SepMaskType::None,
            mask_layout: MaskLayout::FullImage,
            textures: Vec::new(),
            collision_masks: Vec::new(),
            playback_speed: default_playback_speed(),
            playback_speed_type: PlaybackSpeedType::FramesPerSecond,
            nine_slice: None,
            texture_group: None,
            separate_texture: false,
        }
    }

    /// Sets the origin.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Sets the margins (left, right, top, bottom).
    pub fn with_margins(mut self, left: i32, right: i32, top: i32, bottom: i32) -> Self {
        self.margin_left = left;
        self.margin_right = right;
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Appends a texture slot.
    pub fn with_texture(mut self, texture: Option<TextureRef>) -> Self {
        self.textures.push(texture);
        self
    }

    /// Sets the separation mode.
    pub fn with_sep_masks(mut self, sep_masks: SepMaskType) -> Self {
        self.sep_masks = sep_masks;
        self
    }

    /// Appends a collision mask.
    pub fn with_collision_mask(mut self, mask: MaskData) -> Self {
        self.collision_masks.push(mask);
        self
    }

    /// Sets the mask layout.
    pub fn with_mask_layout(mut self, layout: MaskLayout) -> Self {
        self.mask_layout = layout;
        self
    }

    /// Sets the texture group.
    pub fn with_texture_group(mut self, group: impl Into<String>) -> Self {
        self.texture_group = Some(group.into());
        self
    }

    /// Returns true if any frame slot has no texture.
    pub fn any_texture_missing(&self) -> bool {
        self.textures.iter().any(Option::is_none)
    }
}

/// A tile-set background, converted into a single-frame sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceBackground {
    /// Background name.
    pub name: String,

    /// The background's texture page item.
    pub texture: TextureRef,

    /// Texture group found by the texture page lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_group: Option<String>,
}

impl SourceBackground {
    /// Creates a background.
    pub fn new(name: impl Into<String>, texture: TextureRef) -> Self {
        Self {
            name: name.into(),
            texture,
            texture_group: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_sprite_new_covers_canvas() {
        let sprite = SourceSprite::new("spr_block", 32, 16);
        assert_eq!(
            (
                sprite.margin_left,
                sprite.margin_right,
                sprite.margin_top,
                sprite.margin_bottom
            ),
            (0, 31, 0, 15)
        );
    }

    #[test]
    fn test_source_sprite_from_json_defaults() {
        let json = r#"
        {
          "name": "spr_coin",
          "width": 16,
          "height": 16,
          "margin_left": 2,
          "margin_right": 13,
          "margin_top": 2,
          "margin_bottom": 13,
          "sep_masks": "precise",
          "textures": [{ "key": "coin_0.png" }, null]
        }
        "#;

        let sprite: SourceSprite = serde_json::from_str(json).unwrap();
        assert_eq!(sprite.sep_masks, SepMaskType::Precise);
        assert_eq!(sprite.mask_layout, MaskLayout::FullImage);
        assert_eq!(sprite.playback_speed, 30.0);
        assert_eq!(sprite.playback_speed_type, PlaybackSpeedType::FramesPerSecond);
        assert_eq!(sprite.textures.len(), 2);
        assert!(sprite.any_texture_missing());
    }

    #[test]
    fn test_playback_speed_type_is_integer_coded() {
        let json = serde_json::to_string(&PlaybackSpeedType::FramesPerGameFrame).unwrap();
        assert_eq!(json, "1");
        let parsed: PlaybackSpeedType = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, PlaybackSpeedType::FramesPerSecond);
        assert!(serde_json::from_str::<PlaybackSpeedType>("7").is_err());
    }

    #[test]
    fn test_mask_data_from_bits_packs_msb_first() {
        // 10 pixels wide: two bytes per row.
        let mut bits = vec![false; 20];
        bits[0] = true;
        bits[9] = true;
        bits[10 + 7] = true;
        let mask = MaskData::from_bits(10, 2, &bits);
        assert_eq!(mask.data, vec![0b1000_0000, 0b0100_0000, 0b0000_0001, 0]);
        assert_eq!(MaskData::packed_len(10, 2), Some(4));
    }
}
