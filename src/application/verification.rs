//! Source verification use case
//!
//! Verification is opportunistic: a missing record or an index failure is
//! logged and swallowed, never fatal. A persisted marker short-circuits the
//! whole attempt on later runs.

use std::path::Path;

use serde_json::Value;

use crate::domain::entities::{Manifest, ManifestKey};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, ManifestStore, RegistryError, SourceRegistry,
};
use crate::error::MasonResult;

/// What one verification attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No deployment record; nothing to verify
    Skipped,
    /// Marker already persisted; no external call made
    AlreadyMarked,
    /// Registered now; marker persisted
    Verified,
    /// Index already had it; treated as success, marker not persisted
    AlreadyRegistered,
    /// Index failed; swallowed
    Failed,
}

/// Registers deployed artifacts with the external source index.
pub struct VerificationService<'a, R, S>
where
    R: SourceRegistry,
    S: ManifestStore,
{
    registry: &'a R,
    store: &'a S,
    manifest_path: &'a Path,
    events: &'a dyn DeployEventSink,
}

impl<'a, R, S> VerificationService<'a, R, S>
where
    R: SourceRegistry,
    S: ManifestStore,
{
    pub fn new(
        registry: &'a R,
        store: &'a S,
        manifest_path: &'a Path,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            registry,
            store,
            manifest_path,
            events,
        }
    }

    /// Verify one record. Only manifest persistence errors propagate;
    /// registry failures are reported through events and neutralized here.
    pub fn verify(
        &self,
        manifest: &mut Manifest,
        key: &ManifestKey,
        constructor_args: &[Value],
    ) -> MasonResult<VerifyOutcome> {
        let Some(record) = manifest.record(key) else {
            self.events.on_event(DeployEvent::VerificationSkipped {
                key: key.to_string(),
                reason: "no deployment record".to_string(),
            });
            return Ok(VerifyOutcome::Skipped);
        };

        if record.is_verified() {
            self.events.on_event(DeployEvent::VerificationSkipped {
                key: key.to_string(),
                reason: "verification marker already present".to_string(),
            });
            return Ok(VerifyOutcome::AlreadyMarked);
        }

        let address = record.address;
        self.events.on_event(DeployEvent::VerificationSubmitted {
            key: key.to_string(),
            address,
        });

        match self.registry.register(&address, constructor_args) {
            Ok(()) => {
                let url = self.registry.listing_url(&address);
                if let Some(record) = manifest.record_mut(key) {
                    record.verification = Some(url.clone());
                }
                self.store.save(manifest, self.manifest_path)?;
                self.events.on_event(DeployEvent::Verified {
                    key: key.to_string(),
                    url,
                });
                Ok(VerifyOutcome::Verified)
            }
            Err(RegistryError::AlreadyRegistered) => {
                // Success-equivalent, but no marker is written in this
                // branch: later runs will re-ask the index and re-discover
                // the registration instead of short-circuiting locally.
                self.events.on_event(DeployEvent::AlreadyVerified {
                    key: key.to_string(),
                });
                Ok(VerifyOutcome::AlreadyRegistered)
            }
            Err(err) => {
                self.events.on_event(DeployEvent::VerificationFailed {
                    key: key.to_string(),
                    error: err.to_string(),
                });
                Ok(VerifyOutcome::Failed)
            }
        }
    }
}
