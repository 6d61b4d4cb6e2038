//! yyexport Sprite Conversion Backend
//!
//! This crate turns extracted sprite data into normalized sprite records and
//! their frame images.
//!
//! # Pipeline
//!
//! - **Metadata**: symbolic origin and validated bounding box
//! - **Collision shape**: a single precise mask is compared against an
//!   inscribed ellipse and diamond and replaced by the shape when it matches
//! - **Frames**: deterministic frame and keyframe ids, one keyframe per frame
//!   on a single track, placeholder images for missing textures
//! - **Registration**: the sprite name is claimed in a shared
//!   [`ProjectRegistry`]
//!
//! # Example
//!
//! ```
//! use yyexport_backend_sprite::{
//!     ProjectRegistry, SpriteAssembler, TextureBuffer, TextureError, TextureResolver,
//! };
//! use yyexport_spec::{ConvertOptions, Origin, SourceSprite, TextureRef};
//!
//! struct Blank;
//!
//! impl TextureResolver for Blank {
//!     fn resolve(&self, texture: &TextureRef) -> Result<TextureBuffer, TextureError> {
//!         Ok(TextureBuffer::new_transparent(texture.bounding_width, texture.bounding_height))
//!     }
//! }
//!
//! let options = ConvertOptions::default();
//! let registry = ProjectRegistry::new();
//! let assembler = SpriteAssembler::new(&options, &registry, &Blank);
//!
//! let sprite = SourceSprite::new("spr_player", 64, 64)
//!     .with_origin(32, 64)
//!     .with_texture(Some(TextureRef::new("spr_player_0.png").with_bounding(64, 64)));
//!
//! let converted = assembler.convert_sprite(&sprite).unwrap();
//! assert_eq!(converted.record.origin, Origin::BottomCentre);
//! assert!(registry.contains("spr_player"));
//! ```

pub mod assemble;
pub mod batch;
pub mod classify;
pub mod color;
pub mod error;
pub mod frames;
pub mod mask;
pub mod metadata;
pub mod placeholder;
pub mod png;
pub mod registry;
pub mod shape;
pub mod texture;

pub use assemble::{safe_asset_name, ConvertedSprite, SpriteAssembler};
pub use batch::{convert_batch, SourceResource, SpriteOutcome};
pub use classify::{classify, resolve_collision_kind, spans_shape_minimum};
pub use color::Color;
pub use error::{ConvertError, DimensionError, DuplicateNameError, TextureError};
pub use frames::{FrameCanvas, FrameImage, FrameSequence, FrameSequenceBuilder};
pub use mask::{compute_mask_dimensions, mean_absolute_difference, CollisionMask};
pub use metadata::{derive_bounding_box, derive_origin, BoundingBox, Margins};
pub use registry::ProjectRegistry;
pub use texture::{TextureBuffer, TextureResolver};
