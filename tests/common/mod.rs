//! Shared test doubles and fixtures
//!
//! The fakes are deterministic: addresses and transaction hashes come from a
//! counter, and call-side effects (pair creation, lockup deployment) mirror
//! what the real artifacts would record on-ledger.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use mason::config::{
    Config, DeployerConfig, ExternalsConfig, IncentivesConfig, LockupsConfig, NetworkConfig,
    PathsConfig, ProtocolConfig, VerificationConfig,
};
use mason::domain::ports::{
    CodeError, CodeRepository, ContractCode, DeployEvent, DeployEventSink, EventLog, LedgerClient,
    LedgerError, LedgerResult, PendingTx, RegistryError, SourceRegistry, TxReceipt,
};
use mason::{Address, TxHash};

/// Token deployment start recorded by the fake governance token
pub const DEPLOY_START: u64 = 1_700_000_000;

pub fn addr(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xaa;
    bytes[19] = n;
    Address::from_bytes(bytes)
}

pub fn deployer() -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xdd;
    bytes[19] = 1;
    Address::from_bytes(bytes)
}

pub fn external(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xee;
    bytes[19] = n;
    Address::from_bytes(bytes)
}

/// Full configuration against temp paths, two beneficiaries, fake externals.
pub fn test_config(dir: &Path) -> Config {
    let mut beneficiaries = std::collections::BTreeMap::new();
    beneficiaries.insert("team_alpha".to_string(), addr(200));
    beneficiaries.insert("team_beta".to_string(), addr(201));

    Config {
        network: NetworkConfig {
            name: "testnet".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            gas_price: 20_000_000_000,
            confirmations: 3,
            poll_interval_ms: 1,
            confirm_timeout_secs: 5,
            request_timeout_secs: 5,
        },
        deployer: DeployerConfig {
            address: deployer(),
        },
        paths: PathsConfig {
            manifest: dir.join("manifest.json"),
            code_dir: dir.join("artifacts"),
        },
        externals: ExternalsConfig {
            oracle_registry: external(1),
            price_oracle: external(2),
            swap_factory: external(3),
            wrapped_native: external(4),
        },
        protocol: ProtocolConfig {
            council: external(5),
            grants_reserve: external(6),
        },
        incentives: IncentivesConfig {
            rewards_duration_secs: 3_628_800,
        },
        lockups: LockupsConfig {
            duration_secs: 31_536_000,
            beneficiaries,
        },
        verification: VerificationConfig {
            base_url: Some("https://scan.example/contracts".to_string()),
        },
    }
}

#[derive(Debug, Clone)]
pub struct CreateRecord {
    pub code_id: String,
    pub args: Vec<Value>,
    pub gas_price: u64,
    pub address: Address,
}

#[derive(Debug, Clone)]
pub struct CallRecord {
    pub to: Address,
    pub method: String,
    pub args: Vec<Value>,
    pub gas_price: u64,
}

#[derive(Default)]
struct LedgerState {
    next_seq: u64,
    creates: Vec<CreateRecord>,
    calls: Vec<CallRecord>,
    owners: HashMap<Address, Address>,
    views: HashMap<(Address, String), Value>,
    pairs: HashMap<(String, String), Address>,
    receipts: HashMap<TxHash, TxReceipt>,
    factory_tokens: HashMap<Address, Address>,
    fail_create_ids: Vec<String>,
}

/// Deterministic in-memory ledger. Clones share state, so a test can keep a
/// handle for assertions after handing one to the orchestrator.
#[derive(Clone)]
pub struct FakeLedger {
    signer: Address,
    start_time: u64,
    state: Rc<RefCell<LedgerState>>,
}

impl FakeLedger {
    pub fn new(signer: Address) -> Self {
        Self {
            signer,
            start_time: DEPLOY_START,
            state: Rc::new(RefCell::new(LedgerState::default())),
        }
    }

    pub fn with_start_time(mut self, start_time: u64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn renounce(&self, address: &Address) {
        self.state
            .borrow_mut()
            .owners
            .insert(*address, Address::ZERO);
    }

    pub fn set_view(&self, address: Address, method: &str, value: Value) {
        self.state
            .borrow_mut()
            .views
            .insert((address, method.to_string()), value);
    }

    pub fn fail_creates_for(&self, code_id: &str) {
        self.state
            .borrow_mut()
            .fail_create_ids
            .push(code_id.to_string());
    }

    pub fn clear_create_failures(&self) {
        self.state.borrow_mut().fail_create_ids.clear();
    }

    pub fn creates(&self) -> Vec<CreateRecord> {
        self.state.borrow().creates.clone()
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.state.borrow().calls.clone()
    }

    pub fn calls_of(&self, method: &str) -> Vec<CallRecord> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    fn alloc_address(state: &mut LedgerState) -> Address {
        state.next_seq += 1;
        let mut bytes = [0u8; 20];
        bytes[0] = 0xfa;
        bytes[12..20].copy_from_slice(&state.next_seq.to_be_bytes());
        Address::from_bytes(bytes)
    }

    fn alloc_tx(state: &mut LedgerState) -> TxHash {
        state.next_seq += 1;
        let mut bytes = [0u8; 32];
        bytes[0] = 0xfb;
        bytes[24..32].copy_from_slice(&state.next_seq.to_be_bytes());
        TxHash::from_bytes(bytes)
    }

    fn arg_address(args: &[Value], index: usize) -> Address {
        args[index]
            .as_str()
            .expect("address argument")
            .parse()
            .expect("valid address argument")
    }
}

impl LedgerClient for FakeLedger {
    fn signer(&self) -> LedgerResult<Address> {
        Ok(self.signer)
    }

    fn balance(&self, _address: &Address) -> LedgerResult<u128> {
        Ok(10_000_000_000_000_000_000)
    }

    fn submit_create(
        &self,
        code: &ContractCode,
        args: &[Value],
        gas_price: u64,
    ) -> LedgerResult<PendingTx> {
        let mut state = self.state.borrow_mut();
        if state.fail_create_ids.contains(&code.id) {
            return Err(LedgerError::Rejected(format!(
                "creation of '{}' refused",
                code.id
            )));
        }

        let address = Self::alloc_address(&mut state);
        let tx_hash = Self::alloc_tx(&mut state);

        state.creates.push(CreateRecord {
            code_id: code.id.clone(),
            args: args.to_vec(),
            gas_price,
            address,
        });
        state.owners.insert(address, self.signer);
        if code.id == "gov_token" {
            state.views.insert(
                (address, "deploymentStartTime".to_string()),
                Value::from(self.start_time),
            );
        }

        let block_number = 100 + state.creates.len() as u64;
        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number,
                contract_address: Some(address),
                logs: Vec::new(),
            },
        );
        Ok(PendingTx { tx_hash })
    }

    fn submit_call(
        &self,
        address: &Address,
        method: &str,
        args: &[Value],
        gas_price: u64,
    ) -> LedgerResult<PendingTx> {
        let mut state = self.state.borrow_mut();
        let tx_hash = Self::alloc_tx(&mut state);
        state.calls.push(CallRecord {
            to: *address,
            method: method.to_string(),
            args: args.to_vec(),
            gas_price,
        });

        let mut logs = Vec::new();
        match method {
            "createPair" => {
                let pair = Self::alloc_address(&mut state);
                let a = args[0].as_str().expect("token argument").to_string();
                let b = args[1].as_str().expect("token argument").to_string();
                state.pairs.insert((a.clone(), b.clone()), pair);
                state.pairs.insert((b, a), pair);
            }
            "setTokenAddress" => {
                let token = Self::arg_address(args, 0);
                state.factory_tokens.insert(*address, token);
            }
            "deployLockup" => {
                let lockup = Self::alloc_address(&mut state);
                state
                    .views
                    .insert((lockup, "beneficiary".to_string()), args[0].clone());
                state
                    .views
                    .insert((lockup, "unlockTime".to_string()), args[1].clone());
                if let Some(token) = state.factory_tokens.get(address).copied() {
                    state.views.insert(
                        (lockup, "token".to_string()),
                        Value::String(token.to_string()),
                    );
                }
                logs.push(EventLog {
                    emitter: lockup,
                    name: "LockupDeployed".to_string(),
                    params: args.to_vec(),
                });
            }
            _ => {}
        }

        let block_number = 1000 + state.calls.len() as u64;
        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number,
                contract_address: None,
                logs,
            },
        );
        Ok(PendingTx { tx_hash })
    }

    fn await_confirmation(
        &self,
        pending: &PendingTx,
        _confirmations: u64,
    ) -> LedgerResult<TxReceipt> {
        self.state
            .borrow()
            .receipts
            .get(&pending.tx_hash)
            .cloned()
            .ok_or_else(|| LedgerError::Decode(format!("unknown transaction {}", pending.tx_hash)))
    }

    fn query(&self, address: &Address, method: &str, args: &[Value]) -> LedgerResult<Value> {
        let state = self.state.borrow();
        match method {
            "owner" => {
                let owner = state.owners.get(address).copied().unwrap_or(self.signer);
                Ok(Value::String(owner.to_string()))
            }
            "getPair" => {
                let a = args[0].as_str().expect("token argument").to_string();
                let b = args[1].as_str().expect("token argument").to_string();
                let pair = state.pairs.get(&(a, b)).copied().unwrap_or(Address::ZERO);
                Ok(Value::String(pair.to_string()))
            }
            _ => state
                .views
                .get(&(*address, method.to_string()))
                .cloned()
                .ok_or_else(|| {
                    LedgerError::Decode(format!("no view '{method}' at {address}"))
                }),
        }
    }
}

/// In-memory code repository that fabricates bytecode per identifier.
pub struct FakeCodes;

impl CodeRepository for FakeCodes {
    fn load(&self, id: &str) -> Result<ContractCode, CodeError> {
        Ok(ContractCode {
            id: id.to_string(),
            bytecode: format!("0x60{:02x}", id.len()),
            fingerprint: format!("sha256:{:064x}", id.len()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryMode {
    Accept,
    AlreadyRegistered,
    Fail,
}

struct RegistryInner {
    mode: RegistryMode,
    registered: Vec<Address>,
}

/// In-memory source registry recording every registration attempt. Clones
/// share state, like `FakeLedger`.
#[derive(Clone)]
pub struct FakeRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                mode: RegistryMode::Accept,
                registered: Vec::new(),
            })),
        }
    }

    pub fn set_mode(&self, mode: RegistryMode) {
        self.inner.borrow_mut().mode = mode;
    }

    pub fn attempts(&self) -> usize {
        self.inner.borrow().registered.len()
    }

    pub fn registered(&self) -> Vec<Address> {
        self.inner.borrow().registered.clone()
    }
}

impl SourceRegistry for FakeRegistry {
    fn register(&self, address: &Address, _constructor_args: &[Value]) -> Result<(), RegistryError> {
        let mut inner = self.inner.borrow_mut();
        inner.registered.push(*address);
        match inner.mode {
            RegistryMode::Accept => Ok(()),
            RegistryMode::AlreadyRegistered => Err(RegistryError::AlreadyRegistered),
            RegistryMode::Fail => Err(RegistryError::Rejected("index unavailable".to_string())),
        }
    }

    fn listing_url(&self, address: &Address) -> String {
        format!("https://scan.example/contracts/{address}#code")
    }
}

/// Event sink recording everything for assertions.
#[derive(Clone)]
pub struct RecordingEventSink {
    pub events: Arc<Mutex<Vec<DeployEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn recorded(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DeployEventSink for RecordingEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}
