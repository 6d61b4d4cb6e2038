//! Concurrent conversion of many resources.
//!
//! Workers pull the next resource index from a shared counter, so a slow
//! sprite never holds up the others. Outcomes are returned in input order.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};
use parking_lot::Mutex;
use yyexport_spec::{SourceBackground, SourceSprite};

use crate::assemble::{ConvertedSprite, SpriteAssembler};
use crate::error::ConvertError;

/// A resource that converts into a sprite.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResource {
    Sprite(SourceSprite),
    Background(SourceBackground),
}

impl SourceResource {
    /// Name of the source resource.
    pub fn name(&self) -> &str {
        match self {
            SourceResource::Sprite(sprite) => &sprite.name,
            SourceResource::Background(background) => &background.name,
        }
    }
}

/// Result of converting one resource.
#[derive(Debug)]
pub struct SpriteOutcome {
    /// Name of the source resource.
    pub name: String,
    pub result: Result<ConvertedSprite, ConvertError>,
}

impl SpriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl SpriteAssembler<'_> {
    /// Convert any source resource.
    pub fn convert(&self, resource: &SourceResource) -> Result<ConvertedSprite, ConvertError> {
        match resource {
            SourceResource::Sprite(sprite) => self.convert_sprite(sprite),
            SourceResource::Background(background) => self.convert_background(background),
        }
    }
}

/// Convert `resources` on up to `jobs` worker threads.
///
/// A failing resource is logged and reported in its outcome; the remaining
/// resources still convert.
pub fn convert_batch(
    assembler: &SpriteAssembler<'_>,
    resources: &[SourceResource],
    jobs: usize,
) -> Vec<SpriteOutcome> {
    let workers = jobs.clamp(1, resources.len().max(1));
    let next = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<SpriteOutcome>>> =
        Mutex::new((0..resources.len()).map(|_| None).collect());

    std::thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(resource) = resources.get(index) else {
                    break;
                };
                let result = assembler.convert(resource);
                if let Err(e) = &result {
                    warn!("{}: skipped: {}", resource.name(), e);
                }
                slots.lock()[index] = Some(SpriteOutcome {
                    name: resource.name().to_string(),
                    result,
                });
            });
        }
    });

    let outcomes: Vec<SpriteOutcome> = slots.into_inner().into_iter().flatten().collect();
    let converted = outcomes.iter().filter(|o| o.is_ok()).count();
    info!(
        "converted {}/{} resource(s) on {} worker(s)",
        converted,
        outcomes.len(),
        workers
    );
    outcomes
}
