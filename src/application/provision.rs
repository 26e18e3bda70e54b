//! Artifact provisioning use case
//!
//! Load-or-deploy: an artifact already in the manifest is returned without
//! submitting anything; otherwise it is created, confirmed, and recorded -
//! with a manifest save before the address is handed back, so a crash right
//! after confirmation still leaves a resumable state.

use std::path::Path;

use crate::domain::entities::{resolve_args, ArtifactRecord, ArtifactSpec, Manifest};
use crate::domain::ports::{
    CodeRepository, DeployEvent, DeployEventSink, LedgerClient, ManifestStore,
};
use crate::domain::value_objects::Address;
use crate::error::{MasonError, MasonResult};

/// Result of provisioning one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provisioned {
    pub address: Address,
    /// Whether a creation transaction was submitted in this call
    pub created: bool,
}

/// Provisions artifacts idempotently against the manifest.
pub struct Provisioner<'a, L, S, C>
where
    L: LedgerClient,
    S: ManifestStore,
    C: CodeRepository,
{
    ledger: &'a L,
    store: &'a S,
    codes: &'a C,
    manifest_path: &'a Path,
    gas_price: u64,
    confirmations: u64,
    events: &'a dyn DeployEventSink,
}

impl<'a, L, S, C> Provisioner<'a, L, S, C>
where
    L: LedgerClient,
    S: ManifestStore,
    C: CodeRepository,
{
    pub fn new(
        ledger: &'a L,
        store: &'a S,
        codes: &'a C,
        manifest_path: &'a Path,
        gas_price: u64,
        confirmations: u64,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            ledger,
            store,
            codes,
            manifest_path,
            gas_price,
            confirmations,
            events,
        }
    }

    /// Provision one artifact, reusing the manifest record when present.
    ///
    /// No retries: a rejected submission or a confirmation timeout
    /// propagates with the manifest unchanged, leaving the artifact
    /// eligible for provisioning on the next run.
    pub fn provision(
        &self,
        manifest: &mut Manifest,
        spec: &ArtifactSpec,
    ) -> MasonResult<Provisioned> {
        if let Some(record) = manifest.artifact(&spec.name) {
            self.events.on_event(DeployEvent::ArtifactReused {
                name: spec.name.clone(),
                address: record.address,
            });
            return Ok(Provisioned {
                address: record.address,
                created: false,
            });
        }

        let args = resolve_args(&spec.constructor, manifest)?;
        let code = self.codes.load(&spec.code_id)?;

        self.events.on_event(DeployEvent::ArtifactDeploying {
            name: spec.name.clone(),
            code_id: spec.code_id.clone(),
        });

        let pending = self.ledger.submit_create(&code, &args, self.gas_price)?;
        let receipt = self.ledger.await_confirmation(&pending, self.confirmations)?;
        let address = receipt.contract_address.ok_or_else(|| {
            MasonError::InvariantViolation(format!(
                "creation receipt for '{}' carries no contract address",
                spec.name
            ))
        })?;

        manifest.insert_artifact(spec.name.clone(), ArtifactRecord::new(address, receipt.tx_hash));
        self.store.save(manifest, self.manifest_path)?;

        self.events.on_event(DeployEvent::ArtifactDeployed {
            name: spec.name.clone(),
            address,
            tx_hash: receipt.tx_hash,
        });

        Ok(Provisioned {
            address,
            created: true,
        })
    }
}
