//! JSON event sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink};

/// Event sink that outputs NDJSON events
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{event}");
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::RunStarted {
                network,
                deployer,
                balance,
                started_at,
            } => serde_json::json!({
                "event": "run_started",
                "network": network,
                "deployer": deployer.to_string(),
                "balance": balance.to_string(),
                "started_at": started_at.to_rfc3339(),
            }),

            DeployEvent::PhaseStarted { phase } => serde_json::json!({
                "event": "phase_started",
                "phase": phase,
            }),

            DeployEvent::ArtifactReused { name, address } => serde_json::json!({
                "event": "artifact_reused",
                "name": name,
                "address": address.to_string(),
            }),

            DeployEvent::ArtifactDeploying { name, code_id } => serde_json::json!({
                "event": "artifact_deploying",
                "name": name,
                "code_id": code_id,
            }),

            DeployEvent::ArtifactDeployed {
                name,
                address,
                tx_hash,
            } => serde_json::json!({
                "event": "artifact_deployed",
                "name": name,
                "address": address.to_string(),
                "tx_hash": tx_hash.to_string(),
            }),

            DeployEvent::PairExisting { pair } => serde_json::json!({
                "event": "pair_existing",
                "pair": pair.to_string(),
            }),

            DeployEvent::PairCreated { pair } => serde_json::json!({
                "event": "pair_created",
                "pair": pair.to_string(),
            }),

            DeployEvent::WiringSkipped { target, method } => serde_json::json!({
                "event": "wiring_skipped",
                "target": target,
                "method": method,
            }),

            DeployEvent::WiringSubmitted { target, method } => serde_json::json!({
                "event": "wiring_submitted",
                "target": target,
                "method": method,
            }),

            DeployEvent::WiringConfirmed {
                target,
                method,
                tx_hash,
            } => serde_json::json!({
                "event": "wiring_confirmed",
                "target": target,
                "method": method,
                "tx_hash": tx_hash.to_string(),
            }),

            DeployEvent::UnlockTimeDerived { unlock_time } => serde_json::json!({
                "event": "unlock_time_derived",
                "unlock_time": unlock_time,
            }),

            DeployEvent::LockupReused {
                beneficiary,
                address,
            } => serde_json::json!({
                "event": "lockup_reused",
                "beneficiary": beneficiary,
                "address": address.to_string(),
            }),

            DeployEvent::LockupDeploying { beneficiary } => serde_json::json!({
                "event": "lockup_deploying",
                "beneficiary": beneficiary,
            }),

            DeployEvent::LockupDeployed {
                beneficiary,
                address,
                tx_hash,
            } => serde_json::json!({
                "event": "lockup_deployed",
                "beneficiary": beneficiary,
                "address": address.to_string(),
                "tx_hash": tx_hash.to_string(),
            }),

            DeployEvent::VerificationSkipped { key, reason } => serde_json::json!({
                "event": "verification_skipped",
                "key": key,
                "reason": reason,
            }),

            DeployEvent::VerificationSubmitted { key, address } => serde_json::json!({
                "event": "verification_submitted",
                "key": key,
                "address": address.to_string(),
            }),

            DeployEvent::Verified { key, url } => serde_json::json!({
                "event": "verified",
                "key": key,
                "url": url,
            }),

            DeployEvent::AlreadyVerified { key } => serde_json::json!({
                "event": "already_verified",
                "key": key,
            }),

            DeployEvent::VerificationFailed { key, error } => serde_json::json!({
                "event": "verification_failed",
                "key": key,
                "error": error,
            }),

            DeployEvent::RunCompleted {
                provisioned,
                reused,
                wired,
                wiring_skipped,
                lockups_deployed,
                lockups_reused,
                verified,
            } => serde_json::json!({
                "event": "run_completed",
                "provisioned": provisioned,
                "reused": reused,
                "wired": wired,
                "wiring_skipped": wiring_skipped,
                "lockups_deployed": lockups_deployed,
                "lockups_reused": lockups_reused,
                "verified": verified,
            }),

            DeployEvent::RunFailed { phase, error } => serde_json::json!({
                "event": "run_failed",
                "phase": phase,
                "error": error,
            }),
        };

        self.write_event(json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone)]
    struct SharedBuffer(Arc<StdMutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn events_stream_as_ndjson() {
        let buffer = SharedBuffer(Arc::new(StdMutex::new(Vec::new())));
        let sink = JsonEventSink::with_writer(buffer.clone());

        sink.on_event(DeployEvent::PhaseStarted {
            phase: "provision-core".to_string(),
        });
        sink.on_event(DeployEvent::UnlockTimeDerived {
            unlock_time: 1_700_000_000,
        });

        let bytes = buffer.0.lock().unwrap().clone();
        let output = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "phase_started");
        assert_eq!(first["phase"], "provision-core");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "unlock_time_derived");
        assert_eq!(second["unlock_time"], 1_700_000_000u64 as i64);
    }
}
