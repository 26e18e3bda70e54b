//! Blocking JSON-RPC ledger client
//!
//! Implements the LedgerClient port over HTTP. Confirmation is a polling
//! loop: fetch the receipt until the transaction is included, then watch the
//! chain height until enough blocks exist on top of it, bounded by the
//! configured timeout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::NetworkConfig;
use crate::domain::ports::{
    decode_address, decode_u128, decode_u64, EventLog, LedgerClient, LedgerError, LedgerResult,
    PendingTx, TxReceipt,
};
use crate::domain::ports::code_repository::ContractCode;
use crate::domain::value_objects::{Address, TxHash};

/// JSON-RPC 2.0 client for a ledger node
pub struct HttpLedgerClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    poll_interval: Duration,
    confirm_timeout: Duration,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPending {
    tx_hash: TxHash,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    tx_hash: TxHash,
    block_number: u64,
    #[serde(default)]
    contract_address: Option<Address>,
    #[serde(default)]
    logs: Vec<RawLog>,
}

#[derive(Debug, Deserialize)]
struct RawLog {
    emitter: Address,
    event: String,
    #[serde(default)]
    params: Vec<Value>,
}

impl From<RawReceipt> for TxReceipt {
    fn from(raw: RawReceipt) -> Self {
        TxReceipt {
            tx_hash: raw.tx_hash,
            block_number: raw.block_number,
            contract_address: raw.contract_address,
            logs: raw
                .logs
                .into_iter()
                .map(|log| EventLog {
                    emitter: log.emitter,
                    name: log.event,
                    params: log.params,
                })
                .collect(),
        }
    }
}

/// Extract the result from a JSON-RPC envelope, mapping node-side errors to
/// `Rejected`.
fn unwrap_envelope(envelope: RpcEnvelope) -> LedgerResult<Value> {
    if let Some(error) = envelope.error {
        return Err(LedgerError::Rejected(format!(
            "{} (code {})",
            error.message, error.code
        )));
    }
    envelope
        .result
        .ok_or_else(|| LedgerError::Decode("envelope carries neither result nor error".to_string()))
}

impl HttpLedgerClient {
    pub fn new(
        endpoint: impl Into<String>,
        request_timeout: Duration,
        poll_interval: Duration,
        confirm_timeout: Duration,
    ) -> LedgerResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            poll_interval,
            confirm_timeout,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(network: &NetworkConfig) -> LedgerResult<Self> {
        Self::new(
            network.rpc_url.clone(),
            Duration::from_secs(network.request_timeout_secs),
            Duration::from_millis(network.poll_interval_ms),
            Duration::from_secs(network.confirm_timeout_secs),
        )
    }

    fn rpc(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        let envelope: RpcEnvelope = response
            .json()
            .map_err(|e| LedgerError::Decode(e.to_string()))?;
        unwrap_envelope(envelope)
    }

    fn try_receipt(&self, tx_hash: &TxHash) -> LedgerResult<Option<TxReceipt>> {
        let result = self.rpc("ledger_getReceipt", json!([tx_hash.to_string()]))?;
        if result.is_null() {
            return Ok(None);
        }
        let raw: RawReceipt = serde_json::from_value(result)
            .map_err(|e| LedgerError::Decode(format!("receipt: {e}")))?;
        Ok(Some(raw.into()))
    }

    fn block_number(&self) -> LedgerResult<u64> {
        decode_u64(&self.rpc("ledger_blockNumber", json!([]))?)
    }
}

impl LedgerClient for HttpLedgerClient {
    fn signer(&self) -> LedgerResult<Address> {
        decode_address(&self.rpc("ledger_signer", json!([]))?)
    }

    fn balance(&self, address: &Address) -> LedgerResult<u128> {
        decode_u128(&self.rpc("ledger_getBalance", json!([address.to_string()]))?)
    }

    fn submit_create(
        &self,
        code: &ContractCode,
        args: &[Value],
        gas_price: u64,
    ) -> LedgerResult<PendingTx> {
        let result = self.rpc(
            "ledger_submitCreate",
            json!([{
                "bytecode": code.bytecode,
                "args": args,
                "gasPrice": gas_price,
            }]),
        )?;
        let raw: RawPending = serde_json::from_value(result)
            .map_err(|e| LedgerError::Decode(format!("pending handle: {e}")))?;
        Ok(PendingTx {
            tx_hash: raw.tx_hash,
        })
    }

    fn submit_call(
        &self,
        address: &Address,
        method: &str,
        args: &[Value],
        gas_price: u64,
    ) -> LedgerResult<PendingTx> {
        let result = self.rpc(
            "ledger_submitCall",
            json!([{
                "to": address.to_string(),
                "method": method,
                "args": args,
                "gasPrice": gas_price,
            }]),
        )?;
        let raw: RawPending = serde_json::from_value(result)
            .map_err(|e| LedgerError::Decode(format!("pending handle: {e}")))?;
        Ok(PendingTx {
            tx_hash: raw.tx_hash,
        })
    }

    fn await_confirmation(
        &self,
        pending: &PendingTx,
        confirmations: u64,
    ) -> LedgerResult<TxReceipt> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.try_receipt(&pending.tx_hash)? {
                let head = self.block_number()?;
                if head >= receipt.block_number + confirmations {
                    return Ok(receipt);
                }
            }

            if started.elapsed() >= self.confirm_timeout {
                return Err(LedgerError::ConfirmationTimeout {
                    tx_hash: pending.tx_hash,
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn query(&self, address: &Address, method: &str, args: &[Value]) -> LedgerResult<Value> {
        self.rpc(
            "ledger_query",
            json!([{
                "to": address.to_string(),
                "method": method,
                "args": args,
            }]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_envelope_returns_result() {
        let envelope: RpcEnvelope =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x2a"}"#).unwrap();
        assert_eq!(unwrap_envelope(envelope).unwrap(), json!("0x2a"));
    }

    #[test]
    fn unwrap_envelope_maps_node_errors_to_rejected() {
        let envelope: RpcEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"insufficient funds"}}"#,
        )
        .unwrap();
        match unwrap_envelope(envelope) {
            Err(LedgerError::Rejected(reason)) => {
                assert!(reason.contains("insufficient funds"));
                assert!(reason.contains("-32000"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn unwrap_envelope_requires_result_or_error() {
        let envelope: RpcEnvelope = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            unwrap_envelope(envelope),
            Err(LedgerError::Decode(_))
        ));
    }

    #[test]
    fn receipt_parses_with_and_without_creation_address() {
        let raw: RawReceipt = serde_json::from_str(
            r#"{
                "txHash": "0x00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff",
                "blockNumber": 1042,
                "contractAddress": "0x00112233445566778899aabbccddeeff00112233",
                "logs": [
                    {"emitter": "0x00112233445566778899aabbccddeeff00112233", "event": "Created", "params": ["0x01"]}
                ]
            }"#,
        )
        .unwrap();
        let receipt: TxReceipt = raw.into();
        assert_eq!(receipt.block_number, 1042);
        assert!(receipt.contract_address.is_some());
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].name, "Created");

        let raw: RawReceipt = serde_json::from_str(
            r#"{
                "txHash": "0x00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff",
                "blockNumber": 7
            }"#,
        )
        .unwrap();
        let receipt: TxReceipt = raw.into();
        assert!(receipt.contract_address.is_none());
        assert!(receipt.logs.is_empty());
    }
}
