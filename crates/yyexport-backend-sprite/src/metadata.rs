//! Origin and bounding box derivation.

use yyexport_spec::{BboxMode, Origin, SourceSprite};

use crate::error::DimensionError;

/// Inclusive pixel margins of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The margins stored on a source sprite.
    pub fn of(sprite: &SourceSprite) -> Self {
        Self::new(
            sprite.margin_left,
            sprite.margin_right,
            sprite.margin_top,
            sprite.margin_bottom,
        )
    }
}

/// A validated bounding box with its editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
    pub mode: BboxMode,
}

impl BoundingBox {
    /// Inclusive width in pixels.
    pub fn width(&self) -> u32 {
        inclusive_span(self.left, self.right)
    }

    /// Inclusive height in pixels.
    pub fn height(&self) -> u32 {
        inclusive_span(self.top, self.bottom)
    }

    /// The same box expressed relative to its own top-left corner.
    pub fn relative(&self) -> BoundingBox {
        BoundingBox {
            left: 0,
            right: self.right.saturating_sub(self.left),
            top: 0,
            bottom: self.bottom.saturating_sub(self.top),
            mode: self.mode,
        }
    }
}

fn inclusive_span(start: i32, end: i32) -> u32 {
    u32::try_from(i64::from(end) - i64::from(start) + 1).unwrap_or(0)
}

/// Position of an origin coordinate on one axis: 0 (start), 1 (centre),
/// 2 (end), or `None` when it is none of these.
///
/// The centre test runs first, so a zero-length axis reports centre.
fn axis_slot(position: i32, extent: u32) -> Option<u8> {
    let position = i64::from(position);
    if position == i64::from(extent / 2) {
        Some(1)
    } else if position == i64::from(extent) {
        Some(2)
    } else if position == 0 {
        Some(0)
    } else {
        None
    }
}

/// Classify an origin point into one of the nine grid positions, or
/// [`Origin::Custom`] when either coordinate misses every grid line.
pub fn derive_origin(width: u32, height: u32, origin_x: i32, origin_y: i32) -> Origin {
    match (axis_slot(origin_x, width), axis_slot(origin_y, height)) {
        (Some(column), Some(row)) => Origin::from_grid(column, row),
        _ => Origin::Custom,
    }
}

/// Validate source margins against a `width` x `height` canvas and decode
/// the raw bounding box mode.
///
/// The box must be ordered and lie within `0..width` by `0..height`.
pub fn derive_bounding_box(
    margins: Margins,
    raw_mode: u32,
    width: u32,
    height: u32,
) -> Result<BoundingBox, DimensionError> {
    let Margins {
        left,
        right,
        top,
        bottom,
    } = margins;
    if right < left || bottom < top {
        return Err(DimensionError::InvertedBoundingBox {
            left,
            right,
            top,
            bottom,
        });
    }
    if left < 0
        || top < 0
        || i64::from(right) >= i64::from(width)
        || i64::from(bottom) >= i64::from(height)
    {
        return Err(DimensionError::OutsideCanvas {
            left,
            right,
            top,
            bottom,
            width,
            height,
        });
    }
    let mode = u8::try_from(raw_mode)
        .ok()
        .and_then(BboxMode::from_code)
        .ok_or(DimensionError::UnknownBboxMode(raw_mode))?;
    Ok(BoundingBox {
        left,
        right,
        top,
        bottom,
        mode,
    })
}

/// Bounding box mode after accounting for missing textures.
///
/// A sprite with missing frames and no placeholder images keeps a manual box,
/// since the editor would otherwise recompute it from empty frames.
pub fn apply_missing_texture_policy(
    mode: BboxMode,
    any_texture_missing: bool,
    placeholder_enabled: bool,
) -> BboxMode {
    if any_texture_missing && !placeholder_enabled {
        BboxMode::Manual
    } else {
        mode
    }
}
