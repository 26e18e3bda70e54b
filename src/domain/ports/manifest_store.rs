//! ManifestStore port - abstraction for manifest persistence
//!
//! The store rewrites the whole manifest atomically on every save, so a
//! crash mid-write can never leave a half-serialized record behind. Callers
//! save after every state-mutating step; there are no retries here.

use std::path::Path;

use crate::domain::entities::Manifest;

/// Result type for manifest store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Manifest store errors
#[derive(Debug)]
pub enum StoreError {
    /// The persisted representation could not be parsed
    InvalidFormat(String),
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidFormat(msg) => write!(f, "invalid manifest format: {msg}"),
            StoreError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Abstract repository for manifest persistence
pub trait ManifestStore {
    /// Load the manifest; a missing file is an empty manifest, not an error
    fn load(&self, path: &Path) -> StoreResult<Manifest>;

    /// Atomically replace the persisted manifest
    fn save(&self, manifest: &Manifest, path: &Path) -> StoreResult<()>;
}
