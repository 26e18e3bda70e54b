//! Configuration module for Mason
//!
//! One TOML file per target environment. The orchestrator reads these as
//! opaque values; the only provenance check it performs is asserting that
//! the configured deployer matches the identity actually signing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::services::suite::SuiteParams;
use crate::domain::value_objects::Address;
use crate::error::{MasonError, MasonResult};

const SECONDS_IN_SIX_WEEKS: u64 = 60 * 60 * 24 * 7 * 6;
const SECONDS_IN_ONE_YEAR: u64 = 60 * 60 * 24 * 365;

/// Ledger endpoint and transaction tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable environment name, used in logs only
    #[serde(default = "default_network_name")]
    pub name: String,

    pub rpc_url: String,

    /// Gas price attached to every submitted transaction
    pub gas_price: u64,

    /// Blocks required on top of inclusion before a transaction counts as
    /// confirmed
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,

    /// Receipt/height polling cadence while waiting for confirmation
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on a single confirmation wait
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_network_name() -> String {
    "default".to_string()
}

fn default_confirmations() -> u64 {
    3
}

fn default_poll_interval_ms() -> u64 {
    4_000
}

fn default_confirm_timeout_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// The designated deployer identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployerConfig {
    pub address: Address,
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Persisted deployment manifest
    #[serde(default = "default_manifest_path")]
    pub manifest: PathBuf,

    /// Directory holding `<code_id>.hex` creation bytecode files
    #[serde(default = "default_code_dir")]
    pub code_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest_path(),
            code_dir: default_code_dir(),
        }
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("mason.manifest.json")
}

fn default_code_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

/// Already-deployed third-party contracts this environment depends on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalsConfig {
    /// Oracle registry read by the oracle adapter
    pub oracle_registry: Address,
    /// Primary price oracle wired into the price feed
    pub price_oracle: Address,
    /// AMM factory used for the stable/native swap pair
    pub swap_factory: Address,
    /// Wrapped native token
    pub wrapped_native: Address,
}

/// Protocol-owned accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Governance council account
    pub council: Address,
    /// Account receiving the grants/bounties allocation
    pub grants_reserve: Address,
}

/// Liquidity incentives tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncentivesConfig {
    #[serde(default = "default_rewards_duration_secs")]
    pub rewards_duration_secs: u64,
}

impl Default for IncentivesConfig {
    fn default() -> Self {
        Self {
            rewards_duration_secs: default_rewards_duration_secs(),
        }
    }
}

fn default_rewards_duration_secs() -> u64 {
    SECONDS_IN_SIX_WEEKS
}

/// Beneficiary lockup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LockupsConfig {
    /// Offset from the token's recorded deployment start to the shared
    /// unlock time
    #[serde(default = "default_lockup_duration_secs")]
    pub duration_secs: u64,

    /// Beneficiary identifier -> beneficiary account
    #[serde(default)]
    pub beneficiaries: BTreeMap<String, Address>,
}

fn default_lockup_duration_secs() -> u64 {
    SECONDS_IN_ONE_YEAR
}

/// Source verification endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerificationConfig {
    /// Base URL of the verification index; verification is skipped entirely
    /// when unset
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Full per-environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub deployer: DeployerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    pub externals: ExternalsConfig,
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub incentives: IncentivesConfig,
    #[serde(default)]
    pub lockups: LockupsConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> MasonResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MasonError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| MasonError::Config(format!("{}: {e}", path.display())))?;

        config.paths.manifest = expand_home(&config.paths.manifest);
        config.paths.code_dir = expand_home(&config.paths.code_dir);
        Ok(config)
    }

    /// Plan-build parameters derived from this configuration.
    pub fn suite_params(&self) -> SuiteParams {
        SuiteParams {
            oracle_registry: self.externals.oracle_registry,
            price_oracle: self.externals.price_oracle,
            grants_reserve: self.protocol.grants_reserve,
            council: self.protocol.council,
        }
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
