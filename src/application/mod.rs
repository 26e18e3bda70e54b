//! Application layer - use cases orchestrating domain logic over the ports

pub mod lockups;
pub mod orchestrator;
pub mod provision;
pub mod verification;
pub mod wiring;

pub use lockups::{derive_unlock_time, LockupDeployer, LockupOutcome};
pub use orchestrator::{Orchestrator, Phase, RunSummary};
pub use provision::{Provisioned, Provisioner};
pub use verification::{VerificationService, VerifyOutcome};
pub use wiring::{WiringOutcome, WiringSequencer};
