//! Classify command implementation
//!
//! Infers the collision shape of a single mask image.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use yyexport_backend_sprite::png::read_rgba;
use yyexport_backend_sprite::{classify, CollisionMask};
use yyexport_spec::CollisionKind;

/// Parse a `L,R,T,B` bounding box.
pub fn parse_bbox(text: &str) -> Result<(i32, i32, i32, i32)> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid bounding box '{}'", text))?;
    match parts.as_slice() {
        &[left, right, top, bottom] => {
            if right < left || bottom < top {
                bail!("inverted bounding box '{}'", text);
            }
            Ok((left, right, top, bottom))
        }
        _ => bail!("bounding box must be L,R,T,B, got '{}'", text),
    }
}

/// Classify the mask in an image file.
pub fn classify_file(
    mask_path: &Path,
    bbox: (i32, i32, i32, i32),
    precision: f64,
) -> Result<CollisionKind> {
    if !(0.0..=1.0).contains(&precision) {
        bail!("precision must be in [0, 1], got {}", precision);
    }
    let image = read_rgba(mask_path)
        .with_context(|| format!("failed to load mask {}", mask_path.display()))?;
    let mask = CollisionMask::from_texture(&image);
    let (left, right, top, bottom) = bbox;
    let kind = classify(&mask, left, right, top, bottom, precision)
        .with_context(|| format!("failed to classify {}", mask_path.display()))?;
    Ok(kind)
}

/// Run the classify command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(mask_path: &Path, bbox: &str, precision: f64, json: bool) -> Result<ExitCode> {
    let bbox = parse_bbox(bbox)?;
    let kind = classify_file(mask_path, bbox, precision)?;

    if json {
        let output = serde_json::json!({
            "mask": mask_path.display().to_string(),
            "collision_kind": format!("{:?}", kind),
            "code": kind.code(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {} {}",
            "Collision kind:".cyan().bold(),
            format!("{:?}", kind).green().bold(),
            format!("(code {})", kind.code()).dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}
