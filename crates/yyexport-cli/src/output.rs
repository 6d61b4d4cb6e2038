//! Writing converted sprites to disk.
//!
//! Each sprite lands in `sprites/<name>/`: the record as `<name>.yy`, the
//! composite frame images as `<frame>.png` and the layer images under
//! `layers/<frame>/<layer>.png`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use yyexport_backend_sprite::png::{write_rgba, PngConfig};
use yyexport_backend_sprite::ConvertedSprite;

/// What [`write_sprite`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub record_path: PathBuf,
    pub images_written: usize,
    pub images_skipped: usize,
}

/// Directory of a sprite under the output root.
pub fn sprite_dir(out_root: &Path, name: &str) -> PathBuf {
    out_root.join("sprites").join(name)
}

/// Write a converted sprite's record and images.
///
/// With `skip_existing`, image files already on disk are left untouched. The
/// record is always rewritten.
pub fn write_sprite(
    out_root: &Path,
    converted: &ConvertedSprite,
    skip_existing: bool,
) -> Result<WriteSummary> {
    let record = &converted.record;
    let dir = sprite_dir(out_root, &record.name);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let record_path = out_root.join(record.resource_path());
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&record_path, json)
        .with_context(|| format!("failed to write {}", record_path.display()))?;

    let config = PngConfig::default();
    let mut summary = WriteSummary {
        record_path,
        ..WriteSummary::default()
    };
    for (relative, image) in converted.image_files() {
        let path = dir.join(&relative);
        if skip_existing && path.exists() {
            log::debug!("keeping existing {}", path.display());
            summary.images_skipped += 1;
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        write_rgba(image, &path, &config)
            .with_context(|| format!("failed to write {}", path.display()))?;
        summary.images_written += 1;
    }
    Ok(summary)
}
