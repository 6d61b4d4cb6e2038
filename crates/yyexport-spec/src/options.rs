//! Conversion options.
//!
//! Options are loaded from a JSON file (every field optional) and may be
//! overridden from the command line.

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Options controlling sprite conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertOptions {
    /// Try to recognize ellipse and diamond collision masks.
    #[serde(default = "default_true")]
    pub shaped_masks: bool,

    /// Minimum similarity in [0, 1] for a mask to be classified as a shape.
    #[serde(default = "default_precision")]
    pub shaped_mask_precision: f64,

    /// Synthesize a placeholder image for frames whose texture is missing.
    /// When disabled, missing frames become transparent and the bounding box
    /// mode is forced to manual.
    #[serde(default = "default_true")]
    pub missing_texture_placeholder: bool,

    /// Assign texture groups from the texture page lookup.
    #[serde(default = "default_true")]
    pub texture_groups: bool,

    /// Leave frame images that already exist on disk untouched.
    #[serde(default)]
    pub skip_existing: bool,

    /// Number of sprites converted concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_true() -> bool {
    true
}

fn default_precision() -> f64 {
    0.98
}

fn default_jobs() -> usize {
    4
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            shaped_masks: true,
            shaped_mask_precision: default_precision(),
            missing_texture_placeholder: true,
            texture_groups: true,
            skip_existing: false,
            jobs: default_jobs(),
        }
    }
}

impl ConvertOptions {
    /// Sets whether shape inference runs.
    pub fn with_shaped_masks(mut self, enabled: bool) -> Self {
        self.shaped_masks = enabled;
        self
    }

    /// Sets the shape similarity threshold.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.shaped_mask_precision = precision;
        self
    }

    /// Sets whether missing textures get a placeholder image.
    pub fn with_missing_texture_placeholder(mut self, enabled: bool) -> Self {
        self.missing_texture_placeholder = enabled;
        self
    }

    /// Sets the worker count.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Checks that the options are usable.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let precision = self.shaped_mask_precision;
        if !precision.is_finite() || !(0.0..=1.0).contains(&precision) {
            return Err(OptionsError::InvalidPrecision(precision));
        }
        if self.jobs == 0 {
            return Err(OptionsError::NoWorkers);
        }
        Ok(())
    }
}
