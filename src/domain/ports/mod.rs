//! Ports - trait seams between the domain and the outside world

pub mod code_repository;
pub mod deploy_events;
pub mod ledger;
pub mod manifest_store;
pub mod source_registry;

pub use code_repository::{CodeError, CodeRepository, ContractCode};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use ledger::{
    decode_address, decode_u128, decode_u64, EventLog, LedgerClient, LedgerError, LedgerResult,
    PendingTx, TxReceipt,
};
pub use manifest_store::{ManifestStore, StoreError, StoreResult};
pub use source_registry::{RegistryError, SourceRegistry};
