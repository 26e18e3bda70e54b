//! Mason - resumable deployment orchestrator for on-chain protocol suites
//!
//! Mason provisions a fixed, dependency-ordered suite of contracts onto an
//! execution ledger, wires their cross-references afterwards, and records
//! every step in a local manifest so an interrupted run can be re-invoked
//! without re-deploying or re-wiring anything that already exists.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    derive_unlock_time, LockupDeployer, LockupOutcome, Orchestrator, Phase, Provisioned,
    Provisioner, RunSummary, VerificationService, VerifyOutcome, WiringOutcome, WiringSequencer,
};
pub use config::Config;
pub use domain::entities::{
    resolve_args, ArgSpec, ArtifactRecord, ArtifactSpec, DeployPlan, Manifest, ManifestKey,
    PlanError, WiringCall,
};
pub use domain::ports::{
    DeployEvent, DeployEventSink, LedgerClient, ManifestStore, NoopEventSink, SourceRegistry,
};
pub use domain::services::suite;
pub use domain::value_objects::{Address, TxHash};
pub use error::{MasonError, MasonResult};
pub use infrastructure::{
    ConsoleEventSink, DirCodeRepository, HttpLedgerClient, HttpSourceRegistry, JsonEventSink,
    JsonManifestStore,
};
