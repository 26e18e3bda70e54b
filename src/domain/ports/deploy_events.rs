//! Deploy event port
//!
//! Every mutating step reports what it is about to do and what it did
//! through this port. Implementations render progress to a terminal, stream
//! NDJSON for CI, or stay silent.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{Address, TxHash};

/// Event emitted during a deployment run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Run started; identity and balance checked
    RunStarted {
        network: String,
        deployer: Address,
        balance: u128,
        started_at: DateTime<Utc>,
    },

    PhaseStarted {
        phase: String,
    },

    /// Artifact already in the manifest; no transaction submitted
    ArtifactReused {
        name: String,
        address: Address,
    },

    ArtifactDeploying {
        name: String,
        code_id: String,
    },

    ArtifactDeployed {
        name: String,
        address: Address,
        tx_hash: TxHash,
    },

    /// The external swap pair already existed
    PairExisting {
        pair: Address,
    },

    PairCreated {
        pair: Address,
    },

    /// Target has renounced ownership; configuration call not issued
    WiringSkipped {
        target: String,
        method: String,
    },

    WiringSubmitted {
        target: String,
        method: String,
    },

    WiringConfirmed {
        target: String,
        method: String,
        tx_hash: TxHash,
    },

    /// Global lockup unlock timestamp derived from on-ledger state
    UnlockTimeDerived {
        unlock_time: u64,
    },

    LockupReused {
        beneficiary: String,
        address: Address,
    },

    LockupDeploying {
        beneficiary: String,
    },

    LockupDeployed {
        beneficiary: String,
        address: Address,
        tx_hash: TxHash,
    },

    /// Verification not attempted (no record, or marker already present)
    VerificationSkipped {
        key: String,
        reason: String,
    },

    VerificationSubmitted {
        key: String,
        address: Address,
    },

    Verified {
        key: String,
        url: String,
    },

    /// The index reported the artifact as already registered
    AlreadyVerified {
        key: String,
    },

    /// Verification failed; the run continues
    VerificationFailed {
        key: String,
        error: String,
    },

    RunCompleted {
        provisioned: usize,
        reused: usize,
        wired: usize,
        wiring_skipped: usize,
        lockups_deployed: usize,
        lockups_reused: usize,
        verified: usize,
    },

    RunFailed {
        phase: String,
        error: String,
    },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}
