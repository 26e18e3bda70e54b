//! Ledger client implementations

mod http;

pub use http::HttpLedgerClient;
