//! Project-wide resource name registry.
//!
//! Conversions running on different threads register the names they
//! produce here. All state sits behind one lock so a name check and its
//! insertion are a single step.

use std::collections::BTreeMap;

use log::warn;
use parking_lot::Mutex;

use crate::error::DuplicateNameError;

/// Resource kind recorded for converted sprites.
pub const SPRITE_KIND: &str = "sprites";

#[derive(Debug, Default)]
struct RegistryState {
    names: BTreeMap<String, String>,
    missing_texture_seen: bool,
}

/// Thread-safe set of project resource names.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    state: Mutex<RegistryState>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for a resource of the given kind.
    ///
    /// Fails if any resource already holds the name; the registry is left
    /// unchanged in that case.
    pub fn register(&self, name: &str, kind: &str) -> Result<(), DuplicateNameError> {
        let mut state = self.state.lock();
        if let Some(existing) = state.names.get(name) {
            warn!("resource name '{}' registered twice", name);
            return Err(DuplicateNameError {
                name: name.to_string(),
                existing_kind: existing.clone(),
            });
        }
        state.names.insert(name.to_string(), kind.to_string());
        Ok(())
    }

    /// Give up `name` again, e.g. when its resource could not be written.
    /// Returns whether the name was held.
    pub fn release(&self, name: &str) -> bool {
        self.state.lock().names.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.lock().names.contains_key(name)
    }

    /// Kind of the resource holding `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<String> {
        self.state.lock().names.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().names.is_empty()
    }

    /// Snapshot of all registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.state.lock().names.keys().cloned().collect()
    }

    /// Record that at least one sprite references a missing texture.
    pub fn mark_missing_texture(&self) {
        self.state.lock().missing_texture_seen = true;
    }

    /// Whether the missing-texture group has to be emitted.
    pub fn missing_texture_seen(&self) -> bool {
        self.state.lock().missing_texture_seen
    }
}
