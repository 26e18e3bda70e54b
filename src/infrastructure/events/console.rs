//! Console event sink
//!
//! Human-readable progress lines for interactive runs. Failures go to
//! stderr so they survive piping stdout elsewhere.

use crate::domain::ports::{DeployEvent, DeployEventSink};

/// Event sink rendering progress to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEventSink;

impl ConsoleEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::RunStarted {
                network,
                deployer,
                balance,
                started_at,
            } => {
                println!("🚀 Deploying to '{network}' as {deployer}");
                println!("   started: {}", started_at.format("%Y-%m-%d %H:%M:%S UTC"));
                println!("   balance: {balance}");
            }
            DeployEvent::PhaseStarted { phase } => println!("\n▶ {phase}"),
            DeployEvent::ArtifactReused { name, address } => {
                println!("  ↻ {name}: reusing {address}");
            }
            DeployEvent::ArtifactDeploying { name, code_id } => {
                println!("  … {name}: deploying ({code_id})");
            }
            DeployEvent::ArtifactDeployed {
                name,
                address,
                tx_hash,
            } => println!("  ✓ {name}: {address} (tx {tx_hash})"),
            DeployEvent::PairExisting { pair } => println!("  ✓ swap pair exists at {pair}"),
            DeployEvent::PairCreated { pair } => println!("  ✓ swap pair created at {pair}"),
            DeployEvent::WiringSkipped { target, method } => {
                println!("  ⤼ {target}.{method}: ownership renounced, skipped");
            }
            DeployEvent::WiringSubmitted { target, method } => println!("  … {target}.{method}"),
            DeployEvent::WiringConfirmed {
                target,
                method,
                tx_hash,
            } => println!("  ✓ {target}.{method} (tx {tx_hash})"),
            DeployEvent::UnlockTimeDerived { unlock_time } => {
                println!("  ⏱ shared unlock time: {unlock_time}");
            }
            DeployEvent::LockupReused {
                beneficiary,
                address,
            } => println!("  ↻ lockup {beneficiary}: reusing {address}"),
            DeployEvent::LockupDeploying { beneficiary } => {
                println!("  … lockup {beneficiary}: deploying");
            }
            DeployEvent::LockupDeployed {
                beneficiary,
                address,
                tx_hash,
            } => println!("  ✓ lockup {beneficiary}: {address} (tx {tx_hash})"),
            DeployEvent::VerificationSkipped { key, reason } => println!("  - {key}: {reason}"),
            DeployEvent::VerificationSubmitted { key, address } => {
                println!("  … verifying {key} at {address}");
            }
            DeployEvent::Verified { key, url } => println!("  ✓ verified {key}: {url}"),
            DeployEvent::AlreadyVerified { key } => println!("  ✓ {key} already verified"),
            DeployEvent::VerificationFailed { key, error } => {
                eprintln!("  ✗ verification failed for {key}: {error}");
            }
            DeployEvent::RunCompleted { .. } => println!("\n✅ Deployment complete"),
            DeployEvent::RunFailed { phase, error } => {
                eprintln!("\n✗ failed during {phase}: {error}");
            }
        }
    }
}
