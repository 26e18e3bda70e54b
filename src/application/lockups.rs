//! Per-beneficiary lockup deployment use case
//!
//! Every beneficiary gets one time-locked sub-artifact created through the
//! lockup factory, all sharing a single unlock timestamp. The timestamp is
//! derived from the token's on-ledger deployment start, never from the
//! clock, so resumed runs arrive at the same value.

use std::path::Path;

use serde_json::Value;

use crate::config::LockupsConfig;
use crate::domain::entities::{ArtifactRecord, Manifest};
use crate::domain::ports::{
    decode_address, decode_u64, DeployEvent, DeployEventSink, LedgerClient, ManifestStore,
};
use crate::domain::services::suite;
use crate::domain::value_objects::Address;
use crate::error::{MasonError, MasonResult};

/// Counts and the shared unlock timestamp for one lockup pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockupOutcome {
    pub deployed: usize,
    pub reused: usize,
    pub unlock_time: u64,
}

/// Derive the shared unlock timestamp from the token's recorded deployment
/// start. Ledger state, not wall clock: the same value on every run.
pub fn derive_unlock_time<L: LedgerClient>(
    ledger: &L,
    manifest: &Manifest,
    duration_secs: u64,
) -> MasonResult<u64> {
    let token = manifest.address_of(suite::GOV_TOKEN).ok_or_else(|| {
        MasonError::InvariantViolation(
            "governance token must be provisioned before lockups".to_string(),
        )
    })?;
    let start = decode_u64(&ledger.query(&token, "deploymentStartTime", &[])?)?;
    Ok(start + duration_secs)
}

/// Deploys one lockup sub-artifact per configured beneficiary.
pub struct LockupDeployer<'a, L, S>
where
    L: LedgerClient,
    S: ManifestStore,
{
    ledger: &'a L,
    store: &'a S,
    manifest_path: &'a Path,
    gas_price: u64,
    confirmations: u64,
    events: &'a dyn DeployEventSink,
}

impl<'a, L, S> LockupDeployer<'a, L, S>
where
    L: LedgerClient,
    S: ManifestStore,
{
    pub fn new(
        ledger: &'a L,
        store: &'a S,
        manifest_path: &'a Path,
        gas_price: u64,
        confirmations: u64,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            ledger,
            store,
            manifest_path,
            gas_price,
            confirmations,
            events,
        }
    }

    pub fn deploy_all(
        &self,
        manifest: &mut Manifest,
        lockups: &LockupsConfig,
    ) -> MasonResult<LockupOutcome> {
        let token = manifest.address_of(suite::GOV_TOKEN).ok_or_else(|| {
            MasonError::InvariantViolation(
                "governance token must be provisioned before lockups".to_string(),
            )
        })?;
        let factory = manifest.address_of(suite::LOCKUP_FACTORY).ok_or_else(|| {
            MasonError::InvariantViolation(
                "lockup factory must be provisioned before lockups".to_string(),
            )
        })?;

        let unlock_time = derive_unlock_time(self.ledger, manifest, lockups.duration_secs)?;
        self.events
            .on_event(DeployEvent::UnlockTimeDerived { unlock_time });

        let mut outcome = LockupOutcome {
            deployed: 0,
            reused: 0,
            unlock_time,
        };

        // BTreeMap iteration keeps beneficiary order deterministic.
        for (id, beneficiary) in &lockups.beneficiaries {
            let address = match manifest.lockup(id) {
                Some(record) => {
                    self.events.on_event(DeployEvent::LockupReused {
                        beneficiary: id.clone(),
                        address: record.address,
                    });
                    outcome.reused += 1;
                    record.address
                }
                None => {
                    let address =
                        self.deploy_one(manifest, &factory, id, beneficiary, unlock_time)?;
                    outcome.deployed += 1;
                    address
                }
            };
            self.check_lockup(id, &address, &token, beneficiary, unlock_time)?;
        }

        Ok(outcome)
    }

    fn deploy_one(
        &self,
        manifest: &mut Manifest,
        factory: &Address,
        id: &str,
        beneficiary: &Address,
        unlock_time: u64,
    ) -> MasonResult<Address> {
        self.events.on_event(DeployEvent::LockupDeploying {
            beneficiary: id.to_string(),
        });

        let args = vec![
            Value::String(beneficiary.to_string()),
            Value::from(unlock_time),
        ];
        let pending = self
            .ledger
            .submit_call(factory, "deployLockup", &args, self.gas_price)?;
        let receipt = self.ledger.await_confirmation(&pending, self.confirmations)?;

        // The sub-artifact announces itself in the first emitted event.
        let address = receipt.logs.first().map(|log| log.emitter).ok_or_else(|| {
            MasonError::InvariantViolation(format!(
                "lockup deployment for '{id}' emitted no events"
            ))
        })?;

        manifest.insert_lockup(id, ArtifactRecord::new(address, receipt.tx_hash));
        self.store.save(manifest, self.manifest_path)?;

        self.events.on_event(DeployEvent::LockupDeployed {
            beneficiary: id.to_string(),
            address,
            tx_hash: receipt.tx_hash,
        });
        Ok(address)
    }

    /// Cross-check the sub-artifact's stored state against what it was
    /// created with. Two independently derived views disagreeing is fatal.
    fn check_lockup(
        &self,
        id: &str,
        address: &Address,
        token: &Address,
        beneficiary: &Address,
        unlock_time: u64,
    ) -> MasonResult<()> {
        let stored_token = decode_address(&self.ledger.query(address, "token", &[])?)?;
        if stored_token != *token {
            return Err(MasonError::InvariantViolation(format!(
                "lockup '{id}' references token {stored_token}, expected {token}"
            )));
        }

        let stored_beneficiary =
            decode_address(&self.ledger.query(address, "beneficiary", &[])?)?;
        if stored_beneficiary != *beneficiary {
            return Err(MasonError::InvariantViolation(format!(
                "lockup '{id}' stores beneficiary {stored_beneficiary}, expected {beneficiary}"
            )));
        }

        let stored_unlock = decode_u64(&self.ledger.query(address, "unlockTime", &[])?)?;
        if stored_unlock != unlock_time {
            return Err(MasonError::InvariantViolation(format!(
                "lockup '{id}' stores unlock time {stored_unlock}, expected {unlock_time}"
            )));
        }

        Ok(())
    }
}
