//! Deployment orchestrator use case
//!
//! Drives the whole run as a strictly sequential sequence of phases. No
//! phase is retried: a failure propagates with the manifest exactly as of
//! the last successful mutation, and a re-run resumes through the
//! idempotency checks in provisioning, wiring and verification.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::config::Config;
use crate::domain::entities::{resolve_args, ArgSpec, DeployPlan, Manifest, ManifestKey, WiringCall};
use crate::domain::ports::{
    decode_address, CodeRepository, DeployEvent, DeployEventSink, LedgerClient, ManifestStore,
    SourceRegistry,
};
use crate::domain::services::suite;
use crate::domain::value_objects::Address;
use crate::error::{MasonError, MasonResult};

use super::lockups::{derive_unlock_time, LockupDeployer};
use super::provision::Provisioner;
use super::verification::{VerificationService, VerifyOutcome};
use super::wiring::WiringSequencer;

/// Orchestrator phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoadState,
    ProvisionCore,
    EnsureSwapPair,
    ProvisionAuxiliary,
    ProvisionToken,
    WireCore,
    WireToken,
    WireTokenToCore,
    ProvisionLens,
    WireIncentives,
    DeployLockups,
    VerifyAll,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::LoadState => "load-state",
            Phase::ProvisionCore => "provision-core",
            Phase::EnsureSwapPair => "ensure-swap-pair",
            Phase::ProvisionAuxiliary => "provision-auxiliary",
            Phase::ProvisionToken => "provision-token",
            Phase::WireCore => "wire-core",
            Phase::WireToken => "wire-token",
            Phase::WireTokenToCore => "wire-token-to-core",
            Phase::ProvisionLens => "provision-lens",
            Phase::WireIncentives => "wire-incentives",
            Phase::DeployLockups => "deploy-lockups",
            Phase::VerifyAll => "verify-all",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts of what one run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub provisioned: usize,
    pub reused: usize,
    pub wired: usize,
    pub wiring_skipped: usize,
    pub lockups_deployed: usize,
    pub lockups_reused: usize,
    pub verified: usize,
    pub verification_failures: usize,
}

/// Top-level driver over the injected ports.
pub struct Orchestrator<L, S, C, R>
where
    L: LedgerClient,
    S: ManifestStore,
    C: CodeRepository,
    R: SourceRegistry,
{
    ledger: L,
    store: S,
    codes: C,
    registry: Option<R>,
    config: Config,
    events: Arc<dyn DeployEventSink>,
}

impl<L, S, C, R> Orchestrator<L, S, C, R>
where
    L: LedgerClient,
    S: ManifestStore,
    C: CodeRepository,
    R: SourceRegistry,
{
    pub fn new(
        ledger: L,
        store: S,
        codes: C,
        registry: Option<R>,
        config: Config,
        events: Arc<dyn DeployEventSink>,
    ) -> Self {
        Self {
            ledger,
            store,
            codes,
            registry,
            config,
            events,
        }
    }

    /// Run the full deployment sequence.
    pub fn run(&self) -> MasonResult<RunSummary> {
        let mut phase = Phase::LoadState;
        match self.run_phases(&mut phase) {
            Ok(summary) => {
                self.events.on_event(DeployEvent::RunCompleted {
                    provisioned: summary.provisioned,
                    reused: summary.reused,
                    wired: summary.wired,
                    wiring_skipped: summary.wiring_skipped,
                    lockups_deployed: summary.lockups_deployed,
                    lockups_reused: summary.lockups_reused,
                    verified: summary.verified,
                });
                Ok(summary)
            }
            Err(err) => {
                self.events.on_event(DeployEvent::RunFailed {
                    phase: phase.name().to_string(),
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn enter(&self, current: &mut Phase, next: Phase) {
        *current = next;
        self.events.on_event(DeployEvent::PhaseStarted {
            phase: next.name().to_string(),
        });
    }

    fn run_phases(&self, phase: &mut Phase) -> MasonResult<RunSummary> {
        let plan = suite::standard_plan(&self.config.suite_params());
        plan.validate()?;

        self.enter(phase, Phase::LoadState);
        let manifest_path = self.config.paths.manifest.clone();
        let mut manifest = self.store.load(&manifest_path)?;

        let signer = self.ledger.signer()?;
        if signer != self.config.deployer.address {
            return Err(MasonError::ConfigMismatch {
                expected: self.config.deployer.address,
                actual: signer,
            });
        }
        let balance = self.ledger.balance(&signer)?;
        self.events.on_event(DeployEvent::RunStarted {
            network: self.config.network.name.clone(),
            deployer: signer,
            balance,
            started_at: Utc::now(),
        });

        let gas_price = self.config.network.gas_price;
        let confirmations = self.config.network.confirmations;
        let provisioner = Provisioner::new(
            &self.ledger,
            &self.store,
            &self.codes,
            &manifest_path,
            gas_price,
            confirmations,
            self.events.as_ref(),
        );
        let sequencer =
            WiringSequencer::new(&self.ledger, gas_price, confirmations, self.events.as_ref());
        let mut summary = RunSummary::default();

        self.enter(phase, Phase::ProvisionCore);
        self.provision_batch(&provisioner, &mut manifest, &plan.core, &mut summary)?;

        self.enter(phase, Phase::EnsureSwapPair);
        let pair = self.ensure_swap_pair(&manifest)?;

        self.enter(phase, Phase::ProvisionAuxiliary);
        self.provision_batch(&provisioner, &mut manifest, &plan.auxiliary, &mut summary)?;

        self.enter(phase, Phase::ProvisionToken);
        self.provision_batch(&provisioner, &mut manifest, &plan.token, &mut summary)?;

        self.enter(phase, Phase::WireCore);
        self.wire_batch(&sequencer, &manifest, &plan.wire_core, &mut summary)?;

        self.enter(phase, Phase::WireToken);
        self.wire_batch(&sequencer, &manifest, &plan.wire_token, &mut summary)?;

        self.enter(phase, Phase::WireTokenToCore);
        self.wire_batch(&sequencer, &manifest, &plan.wire_token_to_core, &mut summary)?;

        self.enter(phase, Phase::ProvisionLens);
        self.provision_batch(&provisioner, &mut manifest, &plan.lens, &mut summary)?;

        self.enter(phase, Phase::WireIncentives);
        let incentives = WiringCall::new(
            suite::INCENTIVES_POOL,
            "setParams",
            vec![
                ArgSpec::of(suite::GOV_TOKEN),
                ArgSpec::lit(pair.to_string()),
                ArgSpec::lit(self.config.incentives.rewards_duration_secs),
            ],
        );
        self.wire_batch(&sequencer, &manifest, &[incentives], &mut summary)?;

        self.enter(phase, Phase::DeployLockups);
        let lockup_deployer = LockupDeployer::new(
            &self.ledger,
            &self.store,
            &manifest_path,
            gas_price,
            confirmations,
            self.events.as_ref(),
        );
        let lockups = lockup_deployer.deploy_all(&mut manifest, &self.config.lockups)?;
        summary.lockups_deployed = lockups.deployed;
        summary.lockups_reused = lockups.reused;

        self.enter(phase, Phase::VerifyAll);
        if let Some(registry) = &self.registry {
            let (verified, failed) =
                self.verify_suite(registry, &plan, &mut manifest, Some(lockups.unlock_time))?;
            summary.verified = verified;
            summary.verification_failures = failed;
        } else {
            self.events.on_event(DeployEvent::VerificationSkipped {
                key: "*".to_string(),
                reason: "no verification endpoint configured".to_string(),
            });
        }

        Ok(summary)
    }

    fn provision_batch<'a>(
        &self,
        provisioner: &Provisioner<'a, L, S, C>,
        manifest: &mut Manifest,
        specs: &[crate::domain::entities::ArtifactSpec],
        summary: &mut RunSummary,
    ) -> MasonResult<()> {
        for spec in specs {
            let provisioned = provisioner.provision(manifest, spec)?;
            if provisioned.created {
                summary.provisioned += 1;
            } else {
                summary.reused += 1;
            }
        }
        Ok(())
    }

    fn wire_batch<'a>(
        &self,
        sequencer: &WiringSequencer<'a, L>,
        manifest: &Manifest,
        calls: &[WiringCall],
        summary: &mut RunSummary,
    ) -> MasonResult<()> {
        let outcome = sequencer.execute(manifest, calls)?;
        summary.wired += outcome.applied;
        summary.wiring_skipped += outcome.skipped;
        Ok(())
    }

    /// Make sure the stable/native swap pair exists on the external AMM
    /// factory. The factory must report the same pair for both argument
    /// orders; disagreement is fatal.
    fn ensure_swap_pair(&self, manifest: &Manifest) -> MasonResult<Address> {
        let stable = manifest.address_of(suite::STABLE_TOKEN).ok_or_else(|| {
            MasonError::InvariantViolation(
                "stable token must be provisioned before the swap pair".to_string(),
            )
        })?;
        let factory = self.config.externals.swap_factory;
        let wrapped = self.config.externals.wrapped_native;

        let forward = self.query_pair(&factory, &stable, &wrapped)?;
        let reverse = self.query_pair(&factory, &wrapped, &stable)?;
        if forward != reverse {
            return Err(MasonError::InvariantViolation(format!(
                "swap factory reports {forward} and {reverse} for the same token pair"
            )));
        }

        if !forward.is_zero() {
            self.events
                .on_event(DeployEvent::PairExisting { pair: forward });
            return Ok(forward);
        }

        let pending = self.ledger.submit_call(
            &factory,
            "createPair",
            &[
                Value::String(wrapped.to_string()),
                Value::String(stable.to_string()),
            ],
            self.config.network.gas_price,
        )?;
        self.ledger
            .await_confirmation(&pending, self.config.network.confirmations)?;

        let created = self.query_pair(&factory, &stable, &wrapped)?;
        let reverse = self.query_pair(&factory, &wrapped, &stable)?;
        if created.is_zero() || created != reverse {
            return Err(MasonError::InvariantViolation(
                "swap pair creation did not produce a consistent pair address".to_string(),
            ));
        }

        self.events
            .on_event(DeployEvent::PairCreated { pair: created });
        Ok(created)
    }

    fn query_pair(
        &self,
        factory: &Address,
        a: &Address,
        b: &Address,
    ) -> MasonResult<Address> {
        let value = self.ledger.query(
            factory,
            "getPair",
            &[Value::String(a.to_string()), Value::String(b.to_string())],
        )?;
        decode_address(&value).map_err(Into::into)
    }

    /// Run the verification pass over an already-loaded manifest. Public so
    /// the `verify` command can re-run it standalone.
    pub fn verify_all(&self) -> MasonResult<(usize, usize)> {
        let registry = self.registry.as_ref().ok_or_else(|| {
            MasonError::Config("no verification endpoint configured".to_string())
        })?;
        let plan = suite::standard_plan(&self.config.suite_params());
        plan.validate()?;
        let mut manifest = self.store.load(&self.config.paths.manifest)?;

        // Lockup verification needs the shared unlock time, which only
        // exists once the token does.
        let unlock_time =
            derive_unlock_time(&self.ledger, &manifest, self.config.lockups.duration_secs).ok();
        self.verify_suite(registry, &plan, &mut manifest, unlock_time)
    }

    fn verify_suite(
        &self,
        registry: &R,
        plan: &DeployPlan,
        manifest: &mut Manifest,
        unlock_time: Option<u64>,
    ) -> MasonResult<(usize, usize)> {
        let service = VerificationService::new(
            registry,
            &self.store,
            &self.config.paths.manifest,
            self.events.as_ref(),
        );

        let mut verified = 0;
        let mut failed = 0;

        for spec in plan.provisioning_order() {
            let key = ManifestKey::artifact(spec.name.clone());
            // Constructor args are only resolvable for artifacts that made
            // it on-ledger; the service skips missing records anyway.
            let args = if manifest.artifact(&spec.name).is_some() {
                resolve_args(&spec.constructor, manifest)?
            } else {
                Vec::new()
            };
            match service.verify(manifest, &key, &args)? {
                VerifyOutcome::Verified => verified += 1,
                VerifyOutcome::Failed => failed += 1,
                _ => {}
            }
        }

        if let Some(unlock_time) = unlock_time {
            let token = manifest.address_of(suite::GOV_TOKEN);
            for (id, beneficiary) in &self.config.lockups.beneficiaries {
                let key = ManifestKey::lockup(id.clone());
                let mut args = Vec::new();
                if let Some(token) = token {
                    args.push(Value::String(token.to_string()));
                }
                args.push(Value::String(beneficiary.to_string()));
                args.push(Value::from(unlock_time));
                match service.verify(manifest, &key, &args)? {
                    VerifyOutcome::Verified => verified += 1,
                    VerifyOutcome::Failed => failed += 1,
                    _ => {}
                }
            }
        }

        Ok((verified, failed))
    }
}
