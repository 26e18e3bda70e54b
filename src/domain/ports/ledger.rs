//! LedgerClient port - abstraction over the execution ledger
//!
//! The orchestrator never talks to a process-wide connection; the client is
//! injected, which lets tests substitute a deterministic in-memory fake.
//! All waits are coarse blocking waits.

use serde_json::Value;

use crate::domain::ports::code_repository::ContractCode;
use crate::domain::value_objects::{Address, TxHash};

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger operation errors
#[derive(Debug)]
pub enum LedgerError {
    /// The endpoint rejected the submission outright (malformed call,
    /// insufficient funds, ...)
    Rejected(String),
    /// The transaction was not confirmed within the client's bound
    ConfirmationTimeout { tx_hash: TxHash, waited_secs: u64 },
    /// Transport-level failure talking to the endpoint
    Transport(String),
    /// The endpoint returned something that could not be decoded
    Decode(String),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Rejected(reason) => write!(f, "submission rejected: {reason}"),
            LedgerError::ConfirmationTimeout { tx_hash, waited_secs } => {
                write!(f, "transaction {tx_hash} not confirmed after {waited_secs}s")
            }
            LedgerError::Transport(detail) => write!(f, "transport error: {detail}"),
            LedgerError::Decode(detail) => write!(f, "could not decode ledger response: {detail}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Handle for a submitted, not-yet-confirmed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: TxHash,
}

/// One event emitted during transaction execution
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    /// Artifact that emitted the event
    pub emitter: Address,
    pub name: String,
    pub params: Vec<Value>,
}

/// Receipt for a confirmed transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// Set for creation transactions
    pub contract_address: Option<Address>,
    pub logs: Vec<EventLog>,
}

/// Abstract client for submitting to and reading from the execution ledger.
///
/// `await_confirmation` blocks until the transaction is included and the
/// requested number of additional blocks exist on top of it. Neither
/// submission nor confirmation is retried here: a failed run is recovered by
/// re-running the orchestrator against the persisted manifest.
pub trait LedgerClient {
    /// Identity that actually signs and submits transactions
    fn signer(&self) -> LedgerResult<Address>;

    /// Native-unit balance of an account
    fn balance(&self, address: &Address) -> LedgerResult<u128>;

    fn submit_create(
        &self,
        code: &ContractCode,
        args: &[Value],
        gas_price: u64,
    ) -> LedgerResult<PendingTx>;

    fn submit_call(
        &self,
        address: &Address,
        method: &str,
        args: &[Value],
        gas_price: u64,
    ) -> LedgerResult<PendingTx>;

    fn await_confirmation(
        &self,
        pending: &PendingTx,
        confirmations: u64,
    ) -> LedgerResult<TxReceipt>;

    /// Read-only view call; does not submit a transaction
    fn query(&self, address: &Address, method: &str, args: &[Value]) -> LedgerResult<Value>;
}

/// Decode a numeric view-call result. Nodes return either JSON numbers or
/// decimal strings, depending on magnitude.
pub fn decode_u64(value: &Value) -> LedgerResult<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| LedgerError::Decode(format!("not a u64: {n}"))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| LedgerError::Decode(format!("not a u64: '{s}'"))),
        other => Err(LedgerError::Decode(format!("expected number, got {other}"))),
    }
}

/// Decode a balance-sized numeric view-call result.
pub fn decode_u128(value: &Value) -> LedgerResult<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| LedgerError::Decode(format!("not a u128: {n}"))),
        Value::String(s) => s
            .parse::<u128>()
            .map_err(|_| LedgerError::Decode(format!("not a u128: '{s}'"))),
        other => Err(LedgerError::Decode(format!("expected number, got {other}"))),
    }
}

/// Decode an address view-call result.
pub fn decode_address(value: &Value) -> LedgerResult<Address> {
    match value {
        Value::String(s) => s
            .parse::<Address>()
            .map_err(|e| LedgerError::Decode(e.to_string())),
        other => Err(LedgerError::Decode(format!("expected address, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_u64_accepts_numbers_and_strings() {
        assert_eq!(decode_u64(&json!(42)).unwrap(), 42);
        assert_eq!(decode_u64(&json!("1700000000")).unwrap(), 1_700_000_000);
        assert!(decode_u64(&json!(-1)).is_err());
        assert!(decode_u64(&json!("abc")).is_err());
        assert!(decode_u64(&json!(null)).is_err());
    }

    #[test]
    fn decode_u128_accepts_large_decimal_strings() {
        assert_eq!(
            decode_u128(&json!("340282366920938463463374607431768211455")).unwrap(),
            u128::MAX
        );
    }

    #[test]
    fn decode_address_parses_strings() {
        let value = json!("0x00112233445566778899aabbccddeeff00112233");
        let addr = decode_address(&value).unwrap();
        assert_eq!(addr.to_string(), "0x00112233445566778899aabbccddeeff00112233");
        assert!(decode_address(&json!(7)).is_err());
    }

    #[test]
    fn ledger_error_display() {
        let err = LedgerError::Rejected("insufficient funds".into());
        assert!(err.to_string().contains("insufficient funds"));
    }
}
