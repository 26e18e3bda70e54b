//! Mason CLI - deployment orchestrator for on-chain protocol suites
//!
//! Usage: mason <COMMAND>
//!
//! Commands:
//!   deploy  Run the full deployment sequence
//!   plan    Show the resolved deployment plan
//!   status  Compare the persisted manifest against the plan
//!   verify  Re-run source verification only

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

use mason::domain::ports::{DeployEventSink, ManifestStore};
use mason::domain::services::suite;
use mason::infrastructure::{
    ConsoleEventSink, DirCodeRepository, HttpLedgerClient, HttpSourceRegistry, JsonEventSink,
    JsonManifestStore,
};
use mason::{Config, Orchestrator};

/// Mason - resumable deployment orchestrator for on-chain protocol suites
#[derive(Parser, Debug)]
#[command(name = "mason")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output NDJSON events (implied when stdout is not a terminal)
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full deployment sequence against the configured environment
    Deploy {
        /// Path to the environment configuration
        #[arg(short, long, default_value = "mason.toml")]
        config: PathBuf,

        /// Skip the verification phase even if an endpoint is configured
        #[arg(long)]
        skip_verification: bool,
    },

    /// Show the resolved deployment plan and its dependency graph
    Plan {
        /// Path to the environment configuration
        #[arg(short, long, default_value = "mason.toml")]
        config: PathBuf,
    },

    /// Compare the persisted manifest against the plan
    Status {
        /// Path to the environment configuration
        #[arg(short, long, default_value = "mason.toml")]
        config: PathBuf,
    },

    /// Re-run source verification for everything in the manifest
    Verify {
        /// Path to the environment configuration
        #[arg(short, long, default_value = "mason.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json || !std::io::stdout().is_terminal();

    match cli.command {
        Commands::Deploy {
            config,
            skip_verification,
        } => cmd_deploy(&config, skip_verification, json),
        Commands::Plan { config } => cmd_plan(&config),
        Commands::Status { config } => cmd_status(&config),
        Commands::Verify { config } => cmd_verify(&config, json),
    }
}

fn event_sink(json: bool) -> Arc<dyn DeployEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::new())
    }
}

type HttpOrchestrator =
    Orchestrator<HttpLedgerClient, JsonManifestStore, DirCodeRepository, HttpSourceRegistry>;

fn build_orchestrator(config: Config, json: bool, with_verification: bool) -> Result<HttpOrchestrator> {
    let ledger =
        HttpLedgerClient::from_config(&config.network).context("cannot construct ledger client")?;
    let store = JsonManifestStore::new();
    let codes = DirCodeRepository::new(config.paths.code_dir.clone());

    let registry = match (&config.verification.base_url, with_verification) {
        (Some(base_url), true) => Some(
            HttpSourceRegistry::new(
                base_url.clone(),
                Duration::from_secs(config.network.request_timeout_secs),
            )
            .context("cannot construct verification client")?,
        ),
        _ => None,
    };

    Ok(Orchestrator::new(
        ledger,
        store,
        codes,
        registry,
        config,
        event_sink(json),
    ))
}

fn cmd_deploy(config_path: &Path, skip_verification: bool, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;

    if !json {
        println!("📦 Mason Deploy");
        println!("Config: {}", config_path.display());
        println!("Network: {}", config.network.name);
        println!("Manifest: {}", config.paths.manifest.display());
        if skip_verification {
            println!("Option: skipping verification");
        }
        println!();
    }

    let orchestrator = build_orchestrator(config, json, !skip_verification)?;
    let summary = orchestrator.run().context("deployment failed")?;

    if json {
        let output = serde_json::json!({
            "event": "deploy",
            "status": "success",
            "provisioned": summary.provisioned,
            "reused": summary.reused,
            "wired": summary.wired,
            "wiring_skipped": summary.wiring_skipped,
            "lockups_deployed": summary.lockups_deployed,
            "lockups_reused": summary.lockups_reused,
            "verified": summary.verified,
            "verification_failures": summary.verification_failures,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Deploy Results:");
        println!(
            "  ✓ Artifacts: {} deployed, {} reused",
            summary.provisioned, summary.reused
        );
        println!(
            "  ✓ Wiring: {} applied, {} skipped (renounced)",
            summary.wired, summary.wiring_skipped
        );
        println!(
            "  ✓ Lockups: {} deployed, {} reused",
            summary.lockups_deployed, summary.lockups_reused
        );
        if summary.verified > 0 || summary.verification_failures > 0 {
            println!(
                "  ✓ Verification: {} verified, {} failed",
                summary.verified, summary.verification_failures
            );
        }
        println!();
    }

    Ok(())
}

fn cmd_plan(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let plan = suite::standard_plan(&config.suite_params());
    plan.validate()?;

    println!("🗺  Deployment plan for '{}'", config.network.name);

    println!("\nArtifacts (in order):");
    for (index, spec) in plan.provisioning_order().enumerate() {
        if spec.deps.is_empty() {
            println!("  {:2}. {}", index + 1, spec.name);
        } else {
            println!("  {:2}. {} (after: {})", index + 1, spec.name, spec.deps.join(", "));
        }
    }

    println!("\nWiring sequence:");
    for call in plan.wiring_order() {
        println!("  - {}.{}", call.target, call.method);
    }

    println!(
        "\nLockups: {} beneficiaries, unlock {}s after token deployment start",
        config.lockups.beneficiaries.len(),
        config.lockups.duration_secs
    );

    Ok(())
}

fn cmd_status(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let plan = suite::standard_plan(&config.suite_params());
    let store = JsonManifestStore::new();
    let manifest = store.load(&config.paths.manifest)?;

    println!("🔎 Status for '{}'", config.network.name);
    println!("Manifest: {}", config.paths.manifest.display());
    println!();

    let mut deployed = 0usize;
    let mut missing = 0usize;
    for spec in plan.provisioning_order() {
        match manifest.artifact(&spec.name) {
            Some(record) => {
                deployed += 1;
                let marker = if record.is_verified() { " [verified]" } else { "" };
                println!("  ✓ {}: {}{marker}", spec.name, record.address);
            }
            None => {
                missing += 1;
                println!("  ✗ {}: not deployed", spec.name);
            }
        }
    }

    println!();
    for (id, beneficiary) in &config.lockups.beneficiaries {
        match manifest.lockup(id) {
            Some(record) => println!("  ✓ lockup {id}: {} (for {beneficiary})", record.address),
            None => println!("  ✗ lockup {id}: not deployed (for {beneficiary})"),
        }
    }

    println!(
        "\nSummary: {deployed} deployed, {missing} missing, {}/{} lockups",
        manifest.lockup_count(),
        config.lockups.beneficiaries.len()
    );

    Ok(())
}

fn cmd_verify(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;

    if !json {
        println!("🔏 Mason Verify");
        println!("Network: {}", config.network.name);
        println!();
    }

    let orchestrator = build_orchestrator(config, json, true)?;
    let (verified, failed) = orchestrator.verify_all().context("verification failed")?;

    if json {
        let output = serde_json::json!({
            "event": "verify",
            "verified": verified,
            "failed": failed,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\nSummary: {verified} verified, {failed} failed");
    }

    Ok(())
}
