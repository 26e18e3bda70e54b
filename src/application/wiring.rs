//! Wiring sequencer use case
//!
//! Issues the plan's configuration calls strictly in order, one at a time.
//! Each call is guarded on the target's controlling identity: once an
//! artifact has renounced ownership, no further configuration is ever sent
//! to it - even if its stored peer addresses look stale. Calls against
//! still-owned artifacts are issued unconditionally; configuration setters
//! are idempotent re-sets, not additive.

use crate::domain::entities::{resolve_args, Manifest, WiringCall};
use crate::domain::ports::{decode_address, DeployEvent, DeployEventSink, LedgerClient};
use crate::domain::value_objects::Address;
use crate::error::{MasonError, MasonResult};

/// Counts of what one wiring pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WiringOutcome {
    pub applied: usize,
    pub skipped: usize,
}

/// Executes owner-guarded configuration calls in plan order.
pub struct WiringSequencer<'a, L: LedgerClient> {
    ledger: &'a L,
    gas_price: u64,
    confirmations: u64,
    events: &'a dyn DeployEventSink,
}

impl<'a, L: LedgerClient> WiringSequencer<'a, L> {
    pub fn new(
        ledger: &'a L,
        gas_price: u64,
        confirmations: u64,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            ledger,
            gas_price,
            confirmations,
            events,
        }
    }

    pub fn execute(&self, manifest: &Manifest, calls: &[WiringCall]) -> MasonResult<WiringOutcome> {
        let mut outcome = WiringOutcome::default();
        for call in calls {
            if self.apply(manifest, call)? {
                outcome.applied += 1;
            } else {
                outcome.skipped += 1;
            }
        }
        Ok(outcome)
    }

    /// Issue one guarded configuration call. Returns false when the target
    /// has renounced ownership and the call was skipped.
    fn apply(&self, manifest: &Manifest, call: &WiringCall) -> MasonResult<bool> {
        let target = manifest.address_of(&call.target).ok_or_else(|| {
            MasonError::InvariantViolation(format!(
                "wiring call {}.{} against an unprovisioned artifact",
                call.target, call.method
            ))
        })?;

        if self.is_ownership_renounced(&target)? {
            self.events.on_event(DeployEvent::WiringSkipped {
                target: call.target.clone(),
                method: call.method.clone(),
            });
            return Ok(false);
        }

        let args = resolve_args(&call.args, manifest)?;
        self.events.on_event(DeployEvent::WiringSubmitted {
            target: call.target.clone(),
            method: call.method.clone(),
        });

        let pending = self
            .ledger
            .submit_call(&target, &call.method, &args, self.gas_price)?;
        let receipt = self.ledger.await_confirmation(&pending, self.confirmations)?;

        self.events.on_event(DeployEvent::WiringConfirmed {
            target: call.target.clone(),
            method: call.method.clone(),
            tx_hash: receipt.tx_hash,
        });
        Ok(true)
    }

    fn is_ownership_renounced(&self, target: &Address) -> MasonResult<bool> {
        let owner = decode_address(&self.ledger.query(target, "owner", &[])?)?;
        Ok(owner.is_zero())
    }
}
