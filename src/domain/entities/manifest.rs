//! Deployment manifest entity - the persisted record of what exists on-ledger
//!
//! The manifest is the single source of truth across runs. It is a pure data
//! structure; persistence is handled by the `ManifestStore` port. Records are
//! only ever appended or updated, never deleted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Address, TxHash};

/// Record of one created-and-confirmed artifact.
///
/// A record only exists once creation is confirmed, so holding a record at
/// all implies both the address and the creation transaction are known. The
/// verification marker is set strictly later, if ever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub address: Address,
    pub creation_tx: TxHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

impl ArtifactRecord {
    pub fn new(address: Address, creation_tx: TxHash) -> Self {
        Self {
            address,
            creation_tx,
            verification: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verification.is_some()
    }
}

/// Keyspace-qualified manifest key.
///
/// Suite artifacts are keyed by logical name; beneficiary lockups live in
/// their own keyspace, keyed by beneficiary identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestKey {
    Artifact(String),
    Lockup(String),
}

impl ManifestKey {
    pub fn artifact(name: impl Into<String>) -> Self {
        Self::Artifact(name.into())
    }

    pub fn lockup(id: impl Into<String>) -> Self {
        Self::Lockup(id.into())
    }
}

impl fmt::Display for ManifestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artifact(name) => write!(f, "{name}"),
            Self::Lockup(id) => write!(f, "lockup:{id}"),
        }
    }
}

/// The deployment manifest: artifact name -> record, beneficiary -> record.
///
/// `BTreeMap` keeps serialization order stable so re-saving an unchanged
/// manifest produces byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    artifacts: BTreeMap<String, ArtifactRecord>,
    #[serde(default)]
    lockups: BTreeMap<String, ArtifactRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.lockups.is_empty()
    }

    pub fn artifact(&self, name: &str) -> Option<&ArtifactRecord> {
        self.artifacts.get(name)
    }

    /// Address of a provisioned artifact, if it exists yet.
    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.artifacts.get(name).map(|r| r.address)
    }

    pub fn insert_artifact(&mut self, name: impl Into<String>, record: ArtifactRecord) {
        self.artifacts.insert(name.into(), record);
    }

    pub fn lockup(&self, id: &str) -> Option<&ArtifactRecord> {
        self.lockups.get(id)
    }

    pub fn insert_lockup(&mut self, id: impl Into<String>, record: ArtifactRecord) {
        self.lockups.insert(id.into(), record);
    }

    pub fn record(&self, key: &ManifestKey) -> Option<&ArtifactRecord> {
        match key {
            ManifestKey::Artifact(name) => self.artifacts.get(name),
            ManifestKey::Lockup(id) => self.lockups.get(id),
        }
    }

    pub fn record_mut(&mut self, key: &ManifestKey) -> Option<&mut ArtifactRecord> {
        match key {
            ManifestKey::Artifact(name) => self.artifacts.get_mut(name),
            ManifestKey::Lockup(id) => self.lockups.get_mut(id),
        }
    }

    pub fn artifacts(&self) -> impl Iterator<Item = (&String, &ArtifactRecord)> {
        self.artifacts.iter()
    }

    pub fn lockups(&self) -> impl Iterator<Item = (&String, &ArtifactRecord)> {
        self.lockups.iter()
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    pub fn lockup_count(&self) -> usize {
        self.lockups.len()
    }
}
