//! JSON manifest store
//!
//! Implements the ManifestStore port. The manifest is pretty-printed JSON,
//! rewritten in full (atomically) on every save. A missing file is an empty
//! manifest, not an error.

use std::path::Path;

use crate::domain::entities::Manifest;
use crate::domain::ports::{ManifestStore, StoreError, StoreResult};
use crate::infrastructure::fs::atomic_write;

/// File-backed manifest store
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestStore;

impl JsonManifestStore {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestStore for JsonManifestStore {
    fn load(&self, path: &Path) -> StoreResult<Manifest> {
        if !path.exists() {
            return Ok(Manifest::new());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| StoreError::InvalidFormat(e.to_string()))
    }

    fn save(&self, manifest: &Manifest, path: &Path) -> StoreResult<()> {
        let mut json = serde_json::to_string_pretty(manifest)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;
        json.push('\n');
        atomic_write(path, json.as_bytes())?;
        Ok(())
    }
}
