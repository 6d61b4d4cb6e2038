//! Convert command implementation
//!
//! Converts every sprite and background of a manifest and writes the
//! records and frame images under the output root.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use yyexport_backend_sprite::{convert_batch, ProjectRegistry, SpriteAssembler, SpriteOutcome};
use yyexport_spec::{ConvertOptions, MISSING_TEXTURE_GROUP};

use crate::manifest::load_manifest;
use crate::output::write_sprite;
use crate::textures::FileTextureResolver;

/// Arguments of the `convert` command.
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Path to the JSON manifest listing sprites and backgrounds
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Output root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub out_root: PathBuf,

    /// JSON file with conversion options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of sprites converted concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep precise masks instead of detecting ellipses and diamonds
    #[arg(long)]
    pub no_shaped_masks: bool,

    /// Minimum similarity in [0, 1] for shape detection
    #[arg(long)]
    pub precision: Option<f64>,

    /// Leave missing frames transparent instead of drawing a placeholder
    #[arg(long)]
    pub no_placeholder: bool,

    /// Do not overwrite frame images that already exist
    #[arg(long)]
    pub skip_existing: bool,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,
}

/// Load options from `config` (if any) and apply command-line overrides.
pub fn resolve_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ConvertOptions::default(),
    };
    if let Some(jobs) = args.jobs {
        options = options.with_jobs(jobs);
    }
    if let Some(precision) = args.precision {
        options = options.with_precision(precision);
    }
    if args.no_shaped_masks {
        options = options.with_shaped_masks(false);
    }
    if args.no_placeholder {
        options = options.with_missing_texture_placeholder(false);
    }
    if args.skip_existing {
        options.skip_existing = true;
    }
    options.validate()?;
    Ok(options)
}

/// Run the convert command
///
/// # Returns
/// Exit code: 0 if every resource converted, 1 otherwise
pub fn run(args: &ConvertArgs) -> Result<ExitCode> {
    let start = Instant::now();
    let options = resolve_options(args)?;
    let loaded = load_manifest(&args.manifest)?;

    let registry = ProjectRegistry::new();
    let resolver = FileTextureResolver::new(&loaded.base_dir);
    let assembler = SpriteAssembler::new(&options, &registry, &resolver);

    if !args.json {
        println!(
            "{} {} ({} resource(s), {} job(s))",
            "Converting:".cyan().bold(),
            args.manifest.display(),
            loaded.resources.len(),
            options.jobs
        );
    }

    let outcomes = convert_batch(&assembler, &loaded.resources, options.jobs);

    let mut results = Vec::with_capacity(outcomes.len());
    for (i, outcome) in outcomes.iter().enumerate() {
        let result = write_outcome(&args.out_root, outcome, options.skip_existing, &registry);
        if !args.json {
            print_status(i, outcomes.len(), outcome, &result);
        }
        results.push(result);
    }

    let converted = results.iter().filter(|r| r.success).count();
    let failed = results.len() - converted;
    let report = ConvertReport {
        total: results.len(),
        converted,
        failed,
        missing_textures: registry.missing_texture_seen(),
        results,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, start.elapsed().as_secs_f64(), &args.out_root);
    }

    if failed > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Write one converted resource. A sprite whose files cannot be written
/// gives its name back to the registry.
fn write_outcome(
    out_root: &Path,
    outcome: &SpriteOutcome,
    skip_existing: bool,
    registry: &ProjectRegistry,
) -> ConvertResult {
    let converted = match &outcome.result {
        Ok(converted) => converted,
        Err(e) => return ConvertResult::failure(&outcome.name, e.to_string()),
    };
    match write_sprite(out_root, converted, skip_existing) {
        Ok(summary) => ConvertResult {
            source: outcome.name.clone(),
            sprite: Some(converted.record.name.clone()),
            success: true,
            frames: converted.record.frames.len(),
            collision_kind: Some(format!("{:?}", converted.record.collision_kind)),
            images_written: summary.images_written,
            images_skipped: summary.images_skipped,
            error: None,
        },
        Err(e) => {
            registry.release(&converted.record.name);
            ConvertResult::failure(&outcome.name, format!("{:#}", e))
        }
    }
}

fn print_status(i: usize, total: usize, outcome: &SpriteOutcome, result: &ConvertResult) {
    let progress = format!("[{}/{}]", i + 1, total).cyan().bold();
    if result.success {
        let kind = result.collision_kind.as_deref().unwrap_or("-");
        println!(
            "{} {} {} {} {}",
            progress,
            "✓ OK".green().bold(),
            result.sprite.as_deref().unwrap_or(&outcome.name),
            "•".dimmed(),
            format!("{} frame(s), {}", result.frames, kind).dimmed()
        );
    } else {
        println!(
            "{} {} {}: {}",
            progress,
            "✗ SKIP".red().bold(),
            outcome.name,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn print_summary(report: &ConvertReport, elapsed: f64, out_root: &Path) {
    println!("\n{}", "=".repeat(60));
    println!(
        "{} {} {}",
        "Conversion Summary".bold(),
        "•".dimmed(),
        format!("{:.1}s total", elapsed).dimmed()
    );
    println!("  Total:     {}", report.total);
    println!(
        "  Converted: {}",
        if report.failed == 0 {
            report.converted.to_string().green()
        } else {
            report.converted.to_string().normal()
        }
    );
    println!(
        "  Skipped:   {}",
        if report.failed > 0 {
            report.failed.to_string().red()
        } else {
            report.failed.to_string().normal()
        }
    );
    if report.missing_textures {
        println!(
            "  {} some frames had no texture; affected sprites use the '{}' texture group",
            "note:".yellow().bold(),
            MISSING_TEXTURE_GROUP
        );
    }
    println!("Output: {}", out_root.display());
}

#[derive(Debug, Serialize)]
struct ConvertReport {
    total: usize,
    converted: usize,
    failed: usize,
    missing_textures: bool,
    results: Vec<ConvertResult>,
}

#[derive(Debug, Serialize)]
struct ConvertResult {
    source: String,
    sprite: Option<String>,
    success: bool,
    frames: usize,
    collision_kind: Option<String>,
    images_written: usize,
    images_skipped: usize,
    error: Option<String>,
}

impl ConvertResult {
    fn failure(source: &str, error: String) -> Self {
        Self {
            source: source.to_string(),
            sprite: None,
            success: false,
            frames: 0,
            collision_kind: None,
            images_written: 0,
            images_skipped: 0,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yyexport_backend_sprite::ConvertedSprite;
    use yyexport_spec::NormalizedSpriteRecord;

    fn args() -> ConvertArgs {
        ConvertArgs {
            manifest: PathBuf::from("manifest.json"),
            out_root: PathBuf::from("."),
            config: None,
            jobs: None,
            no_shaped_masks: false,
            precision: None,
            no_placeholder: false,
            skip_existing: false,
            json: false,
        }
    }

    #[test]
    fn test_resolve_options_defaults() {
        assert_eq!(resolve_options(&args()).unwrap(), ConvertOptions::default());
    }

    #[test]
    fn test_resolve_options_overrides() {
        let options = resolve_options(&ConvertArgs {
            jobs: Some(2),
            precision: Some(0.9),
            no_shaped_masks: true,
            no_placeholder: true,
            skip_existing: true,
            ..args()
        })
        .unwrap();
        assert_eq!(options.jobs, 2);
        assert_eq!(options.shaped_mask_precision, 0.9);
        assert!(!options.shaped_masks);
        assert!(!options.missing_texture_placeholder);
        assert!(options.skip_existing);
    }

    #[test]
    fn test_resolve_options_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "shaped_mask_precision": 0.95, "jobs": 8 }"#).unwrap();
        let options = resolve_options(&ConvertArgs {
            config: Some(path),
            jobs: Some(1),
            ..args()
        })
        .unwrap();
        assert_eq!(options.shaped_mask_precision, 0.95);
        assert_eq!(options.jobs, 1);
    }

    #[test]
    fn test_resolve_options_rejects_bad_precision() {
        assert!(resolve_options(&ConvertArgs {
            precision: Some(1.5),
            ..args()
        })
        .is_err());
    }

    #[test]
    fn test_failed_write_releases_name() {
        let dir = tempfile::tempdir().unwrap();
        let blocked_root = dir.path().join("not_a_dir");
        std::fs::write(&blocked_root, "file").unwrap();

        let registry = ProjectRegistry::new();
        registry.register("spr_coin", "sprites").unwrap();
        let outcome = SpriteOutcome {
            name: "spr_coin".to_string(),
            result: Ok(ConvertedSprite {
                record: NormalizedSpriteRecord::new("spr_coin", 4, 4),
                images: Vec::new(),
            }),
        };

        let result = write_outcome(&blocked_root, &outcome, false, &registry);
        assert!(!result.success);
        assert!(result.error.is_some());
        assert!(!registry.contains("spr_coin"));
    }

    #[test]
    fn test_written_sprite_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ProjectRegistry::new();
        registry.register("spr_coin", "sprites").unwrap();
        let outcome = SpriteOutcome {
            name: "spr_coin".to_string(),
            result: Ok(ConvertedSprite {
                record: NormalizedSpriteRecord::new("spr_coin", 4, 4),
                images: Vec::new(),
            }),
        };

        let result = write_outcome(dir.path(), &outcome, false, &registry);
        assert!(result.success);
        assert!(registry.contains("spr_coin"));
    }
}
