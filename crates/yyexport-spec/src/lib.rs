//! yyexport Sprite Model Library
//!
//! This crate provides the types shared by every yyexport crate: the source
//! sprite model read out of compiled game data, the normalized sprite record
//! handed to project writers, the conversion options, and deterministic id
//! generation.
//!
//! # Overview
//!
//! - **Source model**: [`SourceSprite`] and [`SourceBackground`] hold raw pixel
//!   extents, margins, texture references and packed collision masks.
//! - **Record**: [`NormalizedSpriteRecord`] holds the symbolic origin,
//!   bounding-box mode, collision kind, frames and the single keyframe track.
//! - **Options**: [`ConvertOptions`] toggles shape inference and missing
//!   texture placeholders.
//!
//! # Example
//!
//! ```
//! use yyexport_spec::{SourceSprite, TextureRef, ConvertOptions};
//!
//! let sprite = SourceSprite::new("spr_player", 64, 64)
//!     .with_origin(32, 64)
//!     .with_texture(Some(TextureRef::new("spr_player_0")));
//!
//! assert_eq!(sprite.textures.len(), 1);
//! assert!(!sprite.any_texture_missing());
//! assert!(ConvertOptions::default().validate().is_ok());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Errors for option validation and integer code decoding
//! - [`id`]: Deterministic GUID generation
//! - [`options`]: Conversion options
//! - [`record`]: Normalized sprite record types
//! - [`source`]: Source sprite model

pub mod error;
pub mod id;
pub mod options;
pub mod record;
pub mod source;

pub use error::{OptionsError, UnknownCode};
pub use id::generate_id;
pub use options::ConvertOptions;
pub use record::{
    BboxMode, CollisionKind, FramesTrack, HighlightStyle, IdPath, ImageLayer, LayerBlendMode,
    NineSliceData, NormalizedSpriteRecord, Origin, Playback, Sequence, SpriteFrame,
    SpriteFrameKeyframe, SpriteKeyframe, SpriteType, TileMode, DEFAULT_TEXTURE_GROUP,
    MISSING_TEXTURE_GROUP,
};
pub use source::{
    MaskData, MaskLayout, PlaybackSpeedType, SepMaskType, SourceBackground, SourceNineSlice,
    SourceSprite, TextureRef,
};
