//! Infrastructure layer - concrete implementations of the domain ports

pub mod events;
pub mod fs;
pub mod ledger;
pub mod registry;
pub mod repositories;

pub use events::{ConsoleEventSink, JsonEventSink};
pub use ledger::HttpLedgerClient;
pub use registry::HttpSourceRegistry;
pub use repositories::{DirCodeRepository, JsonManifestStore};
