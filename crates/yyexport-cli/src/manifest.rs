//! Conversion manifest loading.
//!
//! A manifest lists the sprites and backgrounds to convert:
//!
//! ```json
//! {
//!   "sprites": [
//!     {
//!       "sprite": { "name": "spr_coin", "width": 16, "height": 16,
//!                   "margin_left": 0, "margin_right": 15,
//!                   "margin_top": 0, "margin_bottom": 15,
//!                   "sep_masks": "precise",
//!                   "textures": [{ "key": "coin_0.png" }] },
//!       "masks": ["coin_mask.png"]
//!     }
//!   ],
//!   "backgrounds": [
//!     { "name": "bg_sky", "texture": { "key": "sky.png" } }
//!   ]
//! }
//! ```
//!
//! Texture keys and mask paths are relative to the manifest's directory.
//! Mask images are reduced to one bit per pixel (bright, opaque pixels set).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use yyexport_backend_sprite::png::read_rgba;
use yyexport_backend_sprite::{CollisionMask, SourceResource};
use yyexport_spec::{SourceBackground, SourceSprite};

/// A sprite entry together with its collision mask images.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSprite {
    pub sprite: SourceSprite,

    /// Mask images, one per stored collision mask.
    #[serde(default)]
    pub masks: Vec<String>,
}

/// Raw manifest file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub sprites: Vec<ManifestSprite>,

    #[serde(default)]
    pub backgrounds: Vec<SourceBackground>,
}

/// A manifest resolved into convertible resources.
#[derive(Debug)]
pub struct LoadedManifest {
    /// Directory that texture keys are relative to.
    pub base_dir: PathBuf,
    /// Sprites first, then backgrounds, each in manifest order.
    pub resources: Vec<SourceResource>,
}

/// Parse a manifest from JSON text.
pub fn parse_manifest(json: &str) -> Result<Manifest> {
    serde_json::from_str(json).context("invalid manifest JSON")
}

/// Load a manifest file, decoding mask images and filling in background
/// placement from the texture files where it is missing.
pub fn load_manifest(path: &Path) -> Result<LoadedManifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest =
        parse_manifest(&text).with_context(|| format!("in manifest {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut resources = Vec::with_capacity(manifest.sprites.len() + manifest.backgrounds.len());
    for entry in manifest.sprites {
        resources.push(SourceResource::Sprite(attach_masks(entry, &base_dir)?));
    }
    for background in manifest.backgrounds {
        resources.push(SourceResource::Background(place_background(
            background, &base_dir,
        )?));
    }

    log::info!(
        "loaded {} resource(s) from {}",
        resources.len(),
        path.display()
    );
    Ok(LoadedManifest {
        base_dir,
        resources,
    })
}

fn attach_masks(entry: ManifestSprite, base_dir: &Path) -> Result<SourceSprite> {
    let ManifestSprite { mut sprite, masks } = entry;
    for mask_path in masks {
        let full = base_dir.join(&mask_path);
        let image = read_rgba(&full)
            .with_context(|| format!("{}: failed to load mask {}", sprite.name, full.display()))?;
        sprite
            .collision_masks
            .push(CollisionMask::from_texture(&image).to_packed());
    }
    Ok(sprite)
}

fn place_background(mut background: SourceBackground, base_dir: &Path) -> Result<SourceBackground> {
    let texture = &mut background.texture;
    if texture.target_width == 0 || texture.target_height == 0 {
        let full = base_dir.join(&texture.key);
        let image = read_rgba(&full).with_context(|| {
            format!(
                "{}: failed to load background texture {}",
                background.name,
                full.display()
            )
        })?;
        texture.target_width = image.width;
        texture.target_height = image.height;
    }
    Ok(background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = parse_manifest("{}").unwrap();
        assert!(manifest.sprites.is_empty());
        assert!(manifest.backgrounds.is_empty());
    }

    #[test]
    fn test_parse_manifest_entries() {
        let manifest = parse_manifest(
            r#"{
                "sprites": [
                    {
                        "sprite": { "name": "spr_coin", "width": 16, "height": 16,
                                    "margin_left": 0, "margin_right": 15,
                                    "margin_top": 0, "margin_bottom": 15 },
                        "masks": ["coin_mask.png"]
                    }
                ],
                "backgrounds": [
                    { "name": "bg_sky", "texture": { "key": "sky.png" } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.sprites[0].sprite.name, "spr_coin");
        assert_eq!(manifest.sprites[0].masks, vec!["coin_mask.png"]);
        assert_eq!(manifest.backgrounds[0].texture.key, "sky.png");
    }

    #[test]
    fn test_parse_manifest_rejects_unknown_fields() {
        assert!(parse_manifest(r#"{ "sprite": [] }"#).is_err());
    }
}
