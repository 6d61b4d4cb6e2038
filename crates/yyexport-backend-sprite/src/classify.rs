//! Collision shape inference.
//!
//! A single precise mask is compared against an ellipse and a diamond
//! inscribed in the bounding box. The first reference whose similarity
//! (`1 - mean absolute difference`) reaches the precision threshold wins:
//!
//! ```text
//! cx = (left + (right - 1)) / 2        rx = ((right - 1) - left) / 2 + 0.1
//! cy = (top + (bottom - 1)) / 2        ry = ((bottom - 1) - top) / 2 + 0.1
//! diamond = (cx, top + 0.1), (left + 0.1, cy), (cx, bottom - 1.1), (right - 1.1, cy)
//! ```

use log::debug;
use yyexport_spec::{CollisionKind, ConvertOptions, MaskLayout, SepMaskType, SourceSprite};

use crate::error::DimensionError;
use crate::mask::{compute_mask_dimensions, mean_absolute_difference, CollisionMask};
use crate::metadata::BoundingBox;
use crate::shape::{render_ellipse_mask, render_polygon_mask};

/// Boxes must span more than this many pixels on both axes to be tested.
pub const MIN_SHAPE_SPAN: i32 = 3;

/// Padding added to reference radii and inset from diamond vertices.
const EDGE_PAD: f64 = 0.1;

/// Whether a box is large enough for shape inference.
pub fn spans_shape_minimum(left: i32, right: i32, top: i32, bottom: i32) -> bool {
    let span = |start: i32, end: i32| i64::from(end) - i64::from(start);
    span(left, right) > i64::from(MIN_SHAPE_SPAN) && span(top, bottom) > i64::from(MIN_SHAPE_SPAN)
}

/// Classify a mask as ellipse, diamond or precise.
///
/// `left`..`bottom` are in mask pixel space. Boxes too small for inference
/// are reported as precise. The result depends only on the inputs.
pub fn classify(
    mask: &CollisionMask,
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
    precision: f64,
) -> Result<CollisionKind, DimensionError> {
    if !spans_shape_minimum(left, right, top, bottom) {
        return Ok(CollisionKind::Precise);
    }

    let (l, r, t, b) = (left as f64, right as f64, top as f64, bottom as f64);
    let center_x = (l + (r - 1.0)) / 2.0;
    let center_y = (t + (b - 1.0)) / 2.0;
    let radius_x = ((r - 1.0) - l) / 2.0 + EDGE_PAD;
    let radius_y = ((b - 1.0) - t) / 2.0 + EDGE_PAD;

    let (width, height) = (mask.width(), mask.height());

    let ellipse = render_ellipse_mask(width, height, center_x, center_y, radius_x, radius_y);
    let ellipse_similarity = 1.0 - mean_absolute_difference(mask, &ellipse)?;
    debug!("ellipse similarity {:.4}", ellipse_similarity);
    if ellipse_similarity >= precision {
        return Ok(CollisionKind::Ellipse);
    }

    let diamond = render_polygon_mask(
        width,
        height,
        &[
            [center_x, t + EDGE_PAD],
            [l + EDGE_PAD, center_y],
            [center_x, b - 1.0 - EDGE_PAD],
            [r - 1.0 - EDGE_PAD, center_y],
        ],
    );
    let diamond_similarity = 1.0 - mean_absolute_difference(mask, &diamond)?;
    debug!("diamond similarity {:.4}", diamond_similarity);
    if diamond_similarity >= precision {
        return Ok(CollisionKind::Diamond);
    }

    Ok(CollisionKind::Precise)
}

/// Decide the collision kind of a source sprite.
///
/// Rotated rectangles and plain rectangles pass through. Per-frame masks stay
/// per-frame. A single shared mask is run through [`classify`] when shape
/// inference is enabled and the box is large enough.
pub fn resolve_collision_kind(
    sprite: &SourceSprite,
    bbox: &BoundingBox,
    options: &ConvertOptions,
) -> Result<CollisionKind, DimensionError> {
    match sprite.sep_masks {
        SepMaskType::None => Ok(CollisionKind::Rectangle),
        SepMaskType::RotatedRect => Ok(CollisionKind::RotatedRectangle),
        SepMaskType::Precise => match sprite.collision_masks.as_slice() {
            [] => Ok(CollisionKind::Rectangle),
            [mask] => {
                if !options.shaped_masks
                    || !spans_shape_minimum(bbox.left, bbox.right, bbox.top, bbox.bottom)
                {
                    return Ok(CollisionKind::Precise);
                }
                let (width, height) = compute_mask_dimensions(sprite)?;
                let mask = CollisionMask::from_packed(width, height, mask)?;
                let area = match sprite.mask_layout {
                    MaskLayout::FullImage => *bbox,
                    MaskLayout::BoundingBox => bbox.relative(),
                };
                let kind = classify(
                    &mask,
                    area.left,
                    area.right,
                    area.top,
                    area.bottom,
                    options.shaped_mask_precision,
                )?;
                debug!("{}: collision mask classified as {:?}", sprite.name, kind);
                Ok(kind)
            }
            _ => Ok(CollisionKind::PrecisePerFrame),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yyexport_spec::MaskData;

    fn circle_mask() -> CollisionMask {
        // Radius-7.5 disc centred at (7, 7) on a 16x16 sprite.
        CollisionMask::from_fn(16, 16, |x, y| {
            let dx = x as f64 - 7.0;
            let dy = y as f64 - 7.0;
            dx * dx + dy * dy <= 7.5 * 7.5
        })
    }

    fn diamond_mask() -> CollisionMask {
        // Filled diamond inscribed in the 16x16 box.
        CollisionMask::from_fn(16, 16, |x, y| {
            (x as i32 - 7).abs() + (y as i32 - 7).abs() <= 7
        })
    }

    #[test]
    fn test_rendered_ellipse_is_exact_match() {
        let mask = render_ellipse_mask(16, 16, 7.0, 7.0, 7.1, 7.1);
        assert_eq!(classify(&mask, 0, 15, 0, 15, 1.0), Ok(CollisionKind::Ellipse));
    }

    #[test]
    fn test_circle_classified_as_ellipse() {
        assert_eq!(
            classify(&circle_mask(), 0, 15, 0, 15, 0.98),
            Ok(CollisionKind::Ellipse)
        );
    }

    #[test]
    fn test_diamond_classified_as_diamond() {
        assert_eq!(
            classify(&diamond_mask(), 0, 15, 0, 15, 0.98),
            Ok(CollisionKind::Diamond)
        );
    }

    #[test]
    fn test_ellipse_preferred_when_both_shapes_pass() {
        // The diamond differs from the reference ellipse in 64 of 256 pixels,
        // so its ellipse similarity is exactly 0.75.
        let ellipse = render_ellipse_mask(16, 16, 7.0, 7.0, 7.1, 7.1);
        assert_eq!(mean_absolute_difference(&diamond_mask(), &ellipse), Ok(0.25));
        assert_eq!(
            classify(&diamond_mask(), 0, 15, 0, 15, 0.75),
            Ok(CollisionKind::Ellipse)
        );
        assert_eq!(
            classify(&diamond_mask(), 0, 15, 0, 15, 0.76),
            Ok(CollisionKind::Diamond)
        );
    }

    #[test]
    fn test_irregular_mask_stays_precise() {
        let mask = CollisionMask::from_fn(16, 16, |x, y| (x * y) % 3 == 0);
        assert_eq!(classify(&mask, 0, 15, 0, 15, 0.98), Ok(CollisionKind::Precise));
    }

    #[test]
    fn test_small_box_skips_inference() {
        let mask = CollisionMask::from_fn(8, 8, |_, _| true);
        assert_eq!(classify(&mask, 0, 3, 0, 10, 0.0), Ok(CollisionKind::Precise));
        assert_eq!(classify(&mask, 0, 10, 2, 5, 0.0), Ok(CollisionKind::Precise));
    }

    #[test]
    fn test_extreme_box_does_not_overflow() {
        assert!(spans_shape_minimum(i32::MIN, i32::MAX, i32::MIN, i32::MAX));
        assert!(!spans_shape_minimum(i32::MAX, i32::MIN, 0, 15));
    }

    #[test]
    fn test_zero_precision_accepts_ellipse() {
        let mask = CollisionMask::new(16, 16);
        assert_eq!(classify(&mask, 0, 15, 0, 15, 0.0), Ok(CollisionKind::Ellipse));
    }

    fn precise_sprite(mask: &CollisionMask) -> SourceSprite {
        SourceSprite::new("spr_ball", mask.width(), mask.height())
            .with_margins(0, 15, 0, 15)
            .with_sep_masks(SepMaskType::Precise)
            .with_collision_mask(mask.to_packed())
    }

    fn bbox_of(sprite: &SourceSprite) -> BoundingBox {
        crate::metadata::derive_bounding_box(
            crate::metadata::Margins::of(sprite),
            0,
            sprite.width,
            sprite.height,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_pass_through_kinds() {
        let options = ConvertOptions::default();
        let plain = SourceSprite::new("spr", 16, 16);
        let bbox = bbox_of(&plain);
        assert_eq!(
            resolve_collision_kind(&plain, &bbox, &options),
            Ok(CollisionKind::Rectangle)
        );
        let rotated = plain.clone().with_sep_masks(SepMaskType::RotatedRect);
        assert_eq!(
            resolve_collision_kind(&rotated, &bbox, &options),
            Ok(CollisionKind::RotatedRectangle)
        );
        let no_masks = plain.with_sep_masks(SepMaskType::Precise);
        assert_eq!(
            resolve_collision_kind(&no_masks, &bbox, &options),
            Ok(CollisionKind::Rectangle)
        );
    }

    #[test]
    fn test_resolve_per_frame_masks() {
        let mask = circle_mask();
        let sprite = precise_sprite(&mask).with_collision_mask(mask.to_packed());
        assert_eq!(
            resolve_collision_kind(&sprite, &bbox_of(&sprite), &ConvertOptions::default()),
            Ok(CollisionKind::PrecisePerFrame)
        );
    }

    #[test]
    fn test_resolve_single_mask() {
        let sprite = precise_sprite(&circle_mask());
        let bbox = bbox_of(&sprite);
        assert_eq!(
            resolve_collision_kind(&sprite, &bbox, &ConvertOptions::default()),
            Ok(CollisionKind::Ellipse)
        );
        assert_eq!(
            resolve_collision_kind(
                &sprite,
                &bbox,
                &ConvertOptions::default().with_shaped_masks(false)
            ),
            Ok(CollisionKind::Precise)
        );
    }

    #[test]
    fn test_resolve_bounding_box_layout() {
        // 16x16 diamond stored as a bbox-sized mask of a larger sprite.
        let sprite = SourceSprite::new("spr_gem", 64, 48)
            .with_margins(20, 35, 10, 25)
            .with_mask_layout(MaskLayout::BoundingBox)
            .with_sep_masks(SepMaskType::Precise)
            .with_collision_mask(diamond_mask().to_packed());
        assert_eq!(
            resolve_collision_kind(&sprite, &bbox_of(&sprite), &ConvertOptions::default()),
            Ok(CollisionKind::Diamond)
        );
    }

    #[test]
    fn test_resolve_bad_mask_length() {
        let sprite = SourceSprite::new("spr", 16, 16)
            .with_sep_masks(SepMaskType::Precise)
            .with_collision_mask(MaskData::new(vec![0; 5]));
        assert!(matches!(
            resolve_collision_kind(&sprite, &bbox_of(&sprite), &ConvertOptions::default()),
            Err(DimensionError::MaskDataLength { .. })
        ));
    }
}
