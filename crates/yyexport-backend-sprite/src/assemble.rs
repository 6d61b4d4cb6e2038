//! Sprite assembly.
//!
//! [`SpriteAssembler`] runs one source resource through the whole pipeline:
//! metadata, collision shape, frames, then name registration. A failure at
//! any step abandons that resource only; nothing is registered for it.

use log::{debug, info};
use yyexport_spec::{
    generate_id, BboxMode, ConvertOptions, IdPath, ImageLayer, NineSliceData,
    NormalizedSpriteRecord, SourceBackground, SourceSprite, TextureRef, DEFAULT_TEXTURE_GROUP,
    MISSING_TEXTURE_GROUP,
};

use crate::classify::resolve_collision_kind;
use crate::error::{ConvertError, DimensionError};
use crate::frames::{FrameCanvas, FrameImage, FrameSequence, FrameSequenceBuilder};
use crate::metadata::{
    apply_missing_texture_policy, derive_bounding_box, derive_origin, BoundingBox, Margins,
};
use crate::registry::{ProjectRegistry, SPRITE_KIND};
use crate::texture::{TextureBuffer, TextureResolver};

/// Folder that converted backgrounds are filed under.
pub const TILE_SET_FOLDER: &str = "folders/Tile Sets/";

/// A fully converted sprite: the record plus its frame images.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedSprite {
    pub record: NormalizedSpriteRecord,
    pub images: Vec<FrameImage>,
}

impl ConvertedSprite {
    /// Id of the sprite's image layer.
    pub fn layer_id(&self) -> Option<&str> {
        self.record.layers.first().map(|l| l.name.as_str())
    }

    /// Every image file of the sprite with its path relative to the sprite
    /// directory: the composite image, then the layer image, per frame.
    pub fn image_files(&self) -> Vec<(String, &TextureBuffer)> {
        let layer_id = self.layer_id();
        let mut files = Vec::with_capacity(self.images.len() * 2);
        for frame in &self.images {
            files.push((frame.composite_path(), &frame.image));
            if let Some(layer_id) = layer_id {
                files.push((frame.layer_path(layer_id), &frame.image));
            }
        }
        files
    }
}

/// Replace characters that are not valid in resource names.
///
/// Keeps ASCII letters, digits and underscores; everything else becomes `_`.
/// Names may not start with a digit.
pub fn safe_asset_name(name: &str) -> String {
    let mut safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if safe.is_empty() || safe.starts_with(|c: char| c.is_ascii_digit()) {
        safe.insert(0, '_');
    }
    safe
}

/// Converts source resources into normalized sprite records.
///
/// The assembler holds only shared references, so one instance can be used
/// from many threads at once.
#[derive(Clone, Copy)]
pub struct SpriteAssembler<'a> {
    options: &'a ConvertOptions,
    registry: &'a ProjectRegistry,
    resolver: &'a dyn TextureResolver,
}

impl<'a> SpriteAssembler<'a> {
    pub fn new(
        options: &'a ConvertOptions,
        registry: &'a ProjectRegistry,
        resolver: &'a dyn TextureResolver,
    ) -> Self {
        Self {
            options,
            registry,
            resolver,
        }
    }

    /// Convert a sprite.
    pub fn convert_sprite(&self, source: &SourceSprite) -> Result<ConvertedSprite, ConvertError> {
        let name = source.name.as_str();
        debug!("{}: deriving metadata", name);

        let mut record = NormalizedSpriteRecord::new(name, source.width, source.height);
        record.nine_slice = source.nine_slice.as_ref().map(NineSliceData::from);
        if self.options.texture_groups {
            record.for_3d = source.separate_texture;
            let group = source.texture_group.as_deref().unwrap_or(DEFAULT_TEXTURE_GROUP);
            record.texture_group_id = IdPath::texture_group(group);
        }

        record.origin = derive_origin(source.width, source.height, source.origin_x, source.origin_y);
        let bbox = derive_bounding_box(
            Margins::of(source),
            source.bbox_mode,
            source.width,
            source.height,
        )?;
        record.collision_kind = resolve_collision_kind(source, &bbox, self.options)?;

        let any_missing = source.any_texture_missing();
        if any_missing {
            record.texture_group_id = IdPath::texture_group(MISSING_TEXTURE_GROUP);
        }
        let mode =
            apply_missing_texture_policy(bbox.mode, any_missing, self.options.missing_texture_placeholder);
        set_bbox(&mut record, &bbox, mode);

        record.sequence.playback_speed = source.playback_speed;
        record.sequence.playback_speed_type = source.playback_speed_type;
        record.sequence.xorigin = source.origin_x;
        record.sequence.yorigin = source.origin_y;

        let canvas = FrameCanvas {
            width: source.width,
            height: source.height,
            bbox,
            placeholder: self.options.missing_texture_placeholder,
        };
        let textures: Vec<Option<&TextureRef>> = source.textures.iter().map(Option::as_ref).collect();
        let sequence = self.build_frames(name, &textures, &canvas)?;

        self.finish(record, sequence, any_missing)
    }

    /// Convert a tile-set background into a single-frame sprite named
    /// `<name>_sprite`.
    pub fn convert_background(
        &self,
        source: &SourceBackground,
    ) -> Result<ConvertedSprite, ConvertError> {
        let name = safe_asset_name(&format!("{}_sprite", source.name));
        debug!("{}: converting background {}", name, source.name);

        let texture = &source.texture;
        let (width, height) = background_canvas(texture);
        let bbox = derive_bounding_box(
            background_margins(texture)?,
            u32::from(BboxMode::Automatic.code()),
            width,
            height,
        )?;

        let mut record = NormalizedSpriteRecord::new(name.as_str(), width, height);
        record.parent = IdPath::folder("Sprites", TILE_SET_FOLDER);
        if self.options.texture_groups {
            let group = source.texture_group.as_deref().unwrap_or(DEFAULT_TEXTURE_GROUP);
            record.texture_group_id = IdPath::texture_group(group);
        }
        set_bbox(&mut record, &bbox, bbox.mode);

        let canvas = FrameCanvas {
            width,
            height,
            bbox,
            placeholder: self.options.missing_texture_placeholder,
        };
        let sequence = self.build_frames(&name, &[Some(texture)], &canvas)?;

        self.finish(record, sequence, false)
    }

    fn build_frames(
        &self,
        name: &str,
        textures: &[Option<&TextureRef>],
        canvas: &FrameCanvas,
    ) -> Result<FrameSequence, ConvertError> {
        let mut builder = FrameSequenceBuilder::new(name);
        for (index, texture) in textures.iter().enumerate() {
            builder.build_frame(index as u32, *texture, self.resolver, canvas)?;
        }
        Ok(builder.finish())
    }

    /// Complete the record, claim its name, then flag missing textures for
    /// the project.
    fn finish(
        &self,
        mut record: NormalizedSpriteRecord,
        sequence: FrameSequence,
        missing_texture: bool,
    ) -> Result<ConvertedSprite, ConvertError> {
        record.sequence.length = sequence.frames.len() as f32;
        record.sequence.track = sequence.track;
        record.frames = sequence.frames;
        record
            .layers
            .push(ImageLayer::new(generate_id(&format!("{}.layer", record.name))));

        self.registry.register(&record.name, SPRITE_KIND)?;
        if missing_texture {
            self.registry.mark_missing_texture();
        }
        info!(
            "{}: {} frame(s), collision {:?}, origin {:?}",
            record.name,
            record.frames.len(),
            record.collision_kind,
            record.origin
        );
        Ok(ConvertedSprite {
            record,
            images: sequence.images,
        })
    }
}

fn set_bbox(record: &mut NormalizedSpriteRecord, bbox: &BoundingBox, mode: BboxMode) {
    record.bbox_left = bbox.left;
    record.bbox_right = bbox.right;
    record.bbox_top = bbox.top;
    record.bbox_bottom = bbox.bottom;
    record.bbox_mode = mode;
}

/// Canvas size of a background: its bounding size, or the target rectangle
/// when no bounding size is known.
fn background_canvas(texture: &TextureRef) -> (u32, u32) {
    let width = if texture.bounding_width > 0 {
        texture.bounding_width
    } else {
        texture.target_x.saturating_add(texture.target_width)
    };
    let height = if texture.bounding_height > 0 {
        texture.bounding_height
    } else {
        texture.target_y.saturating_add(texture.target_height)
    };
    (width, height)
}

/// Bounding box of a background: the opaque target rectangle.
fn background_margins(texture: &TextureRef) -> Result<Margins, DimensionError> {
    let too_large = DimensionError::TooLarge {
        width: texture.target_width,
        height: texture.target_height,
    };
    let left = i32::try_from(texture.target_x).map_err(|_| too_large.clone())?;
    let top = i32::try_from(texture.target_y).map_err(|_| too_large.clone())?;
    let right = i32::try_from(i64::from(texture.target_x) + i64::from(texture.target_width) - 1)
        .map_err(|_| too_large.clone())?;
    let bottom = i32::try_from(i64::from(texture.target_y) + i64::from(texture.target_height) - 1)
        .map_err(|_| too_large)?;
    Ok(Margins::new(left, right, top, bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::TextureError;
    use crate::mask::CollisionMask;
    use pretty_assertions::assert_eq;
    use yyexport_spec::{CollisionKind, Origin, SepMaskType, SourceNineSlice};

    struct SolidResolver;

    impl TextureResolver for SolidResolver {
        fn resolve(&self, texture: &TextureRef) -> Result<TextureBuffer, TextureError> {
            match texture.key.as_str() {
                "missing.png" => Err(TextureError::NotFound(texture.key.clone())),
                _ => Ok(TextureBuffer::new(
                    texture.bounding_width.max(1),
                    texture.bounding_height.max(1),
                    Color::white(),
                )),
            }
        }
    }

    fn sprite() -> SourceSprite {
        SourceSprite::new("spr_player", 32, 32)
            .with_origin(16, 32)
            .with_texture(Some(TextureRef::new("a.png").with_bounding(32, 32)))
            .with_texture(Some(TextureRef::new("b.png").with_bounding(32, 32)))
    }

    #[test]
    fn test_safe_asset_name() {
        assert_eq!(safe_asset_name("bg_sky_sprite"), "bg_sky_sprite");
        assert_eq!(safe_asset_name("bg sky-1"), "bg_sky_1");
        assert_eq!(safe_asset_name("1up"), "_1up");
        assert_eq!(safe_asset_name(""), "_");
    }

    #[test]
    fn test_convert_sprite_basic() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let converted = assembler.convert_sprite(&sprite()).unwrap();
        let record = &converted.record;

        assert_eq!(record.origin, Origin::BottomCentre);
        assert_eq!(record.collision_kind, CollisionKind::Rectangle);
        assert_eq!(record.frames.len(), 2);
        assert_eq!(record.sequence.length, 2.0);
        assert_eq!(record.sequence.track.keyframes.len(), 2);
        assert_eq!((record.sequence.xorigin, record.sequence.yorigin), (16, 32));
        assert_eq!(record.layers.len(), 1);
        assert_eq!(record.layers[0].name, generate_id("spr_player.layer"));
        assert_eq!(record.texture_group_id, IdPath::texture_group("Default"));
        assert_eq!(converted.image_files().len(), 4);
        assert!(registry.contains("spr_player"));
        assert!(!registry.missing_texture_seen());
    }

    #[test]
    fn test_missing_texture_handling() {
        let options = ConvertOptions::default().with_missing_texture_placeholder(false);
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let source = sprite().with_texture(None);
        let converted = assembler.convert_sprite(&source).unwrap();

        assert_eq!(converted.record.bbox_mode, BboxMode::Manual);
        assert_eq!(
            converted.record.texture_group_id,
            IdPath::texture_group(MISSING_TEXTURE_GROUP)
        );
        assert_eq!(converted.images[2].image.get(0, 0), Color::transparent());
        assert!(registry.missing_texture_seen());
    }

    #[test]
    fn test_missing_texture_with_placeholder_keeps_mode() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let converted = assembler.convert_sprite(&sprite().with_texture(None)).unwrap();
        assert_eq!(converted.record.bbox_mode, BboxMode::Automatic);
        assert_eq!(converted.images[2].image.get(0, 0), Color::fuchsia());
    }

    #[test]
    fn test_failed_sprite_is_not_registered() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let source = sprite().with_texture(Some(TextureRef::new("missing.png")));
        let err = assembler.convert_sprite(&source).unwrap_err();
        assert!(matches!(err, ConvertError::TextureAcquisition { index: 2, .. }));
        assert!(!registry.contains("spr_player"));
    }

    #[test]
    fn test_failed_sprite_does_not_flag_missing_textures() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let source = sprite()
            .with_texture(None)
            .with_texture(Some(TextureRef::new("missing.png")));
        assert!(matches!(
            assembler.convert_sprite(&source),
            Err(ConvertError::TextureAcquisition { index: 3, .. })
        ));
        assert!(!registry.missing_texture_seen());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_does_not_flag_missing_textures() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        assembler.convert_sprite(&sprite()).unwrap();
        assert!(assembler.convert_sprite(&sprite().with_texture(None)).is_err());
        assert!(!registry.missing_texture_seen());
    }

    #[test]
    fn test_margins_outside_canvas_rejected() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let mask = CollisionMask::from_fn(32, 32, |x, y| (x + y) % 2 == 0);
        let source = sprite()
            .with_margins(-2_000_000_000, 2_000_000_000, 0, 15)
            .with_sep_masks(SepMaskType::Precise)
            .with_collision_mask(mask.to_packed());
        assert!(matches!(
            assembler.convert_sprite(&source),
            Err(ConvertError::Dimension(DimensionError::OutsideCanvas { .. }))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_inverted_margins_rejected() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let source = sprite().with_margins(20, 10, 0, 31);
        assert!(matches!(
            assembler.convert_sprite(&source),
            Err(ConvertError::Dimension(DimensionError::InvertedBoundingBox { .. }))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_name() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        assembler.convert_sprite(&sprite()).unwrap();
        assert!(matches!(
            assembler.convert_sprite(&sprite()),
            Err(ConvertError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_nine_slice_and_texture_group() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let mut source = sprite().with_texture_group("UI");
        source.separate_texture = true;
        source.nine_slice = Some(SourceNineSlice {
            left: 4,
            top: 4,
            right: 4,
            bottom: 4,
            enabled: true,
            tile_modes: [0, 1, 0, 1, 2],
        });
        let record = assembler.convert_sprite(&source).unwrap().record;
        assert_eq!(record.texture_group_id, IdPath::texture_group("UI"));
        assert!(record.for_3d);
        assert!(record.nine_slice.map(|n| n.enabled).unwrap_or(false));
    }

    #[test]
    fn test_texture_groups_disabled() {
        let options = ConvertOptions {
            texture_groups: false,
            ..ConvertOptions::default()
        };
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let record = assembler
            .convert_sprite(&sprite().with_texture_group("UI"))
            .unwrap()
            .record;
        assert_eq!(record.texture_group_id, IdPath::texture_group("Default"));
    }

    #[test]
    fn test_shaped_mask_sprite() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let mask = crate::shape::render_ellipse_mask(32, 32, 15.0, 15.0, 15.1, 15.1);
        let source = sprite()
            .with_sep_masks(SepMaskType::Precise)
            .with_collision_mask(mask.to_packed());
        let record = assembler.convert_sprite(&source).unwrap().record;
        assert_eq!(record.collision_kind, CollisionKind::Ellipse);
    }

    #[test]
    fn test_convert_background() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let texture = TextureRef::new("bg_sky.png")
            .with_target(2, 3, 60, 40)
            .with_bounding(64, 48);
        let converted = assembler
            .convert_background(&SourceBackground::new("bg sky", texture))
            .unwrap();
        let record = &converted.record;

        assert_eq!(record.name, "bg_sky_sprite");
        assert_eq!((record.width, record.height), (64, 48));
        assert_eq!(
            (record.bbox_left, record.bbox_right, record.bbox_top, record.bbox_bottom),
            (2, 61, 3, 42)
        );
        assert_eq!(record.parent.path, "folders/Tile Sets/Sprites.yy");
        assert_eq!(record.frames.len(), 1);
        assert_eq!(record.sequence.length, 1.0);
        assert!(registry.contains("bg_sky_sprite"));
    }

    #[test]
    fn test_background_without_target_rejected() {
        let options = ConvertOptions::default();
        let registry = ProjectRegistry::new();
        let assembler = SpriteAssembler::new(&options, &registry, &SolidResolver);

        let result =
            assembler.convert_background(&SourceBackground::new("bg", TextureRef::new("bg.png")));
        assert!(matches!(
            result,
            Err(ConvertError::Dimension(DimensionError::InvertedBoundingBox { .. }))
        ));
    }
}
