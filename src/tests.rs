//! Scripted RPC fake and end-to-end scenarios for the creation-slot scan.

use crate::aggregator::{AnalysisError, CreationSlotAggregator};
use crate::build_aggregator;
use crate::extractor::ProgramScope;
use crate::retry::RetryPolicy;
use crate::rpc::{RpcError, RpcTransport, GET_SIGNATURES_FOR_ADDRESS, GET_TRANSACTION};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory node. Each signature has a queue of responses; the last one
/// repeats forever, so repeated runs see the same history.
pub(crate) struct ScriptedRpc {
    signatures: Result<Value, RpcError>,
    transactions: Mutex<HashMap<String, VecDeque<Result<Value, RpcError>>>>,
    lookups: Mutex<HashMap<String, usize>>,
    listings: AtomicUsize,
}

impl ScriptedRpc {
    pub(crate) fn new() -> Self {
        Self {
            signatures: Ok(json!([])),
            transactions: Mutex::new(HashMap::new()),
            lookups: Mutex::new(HashMap::new()),
            listings: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_signatures(mut self, result: Value) -> Self {
        self.signatures = Ok(result);
        self
    }

    pub(crate) fn with_signature_error(mut self, error: RpcError) -> Self {
        self.signatures = Err(error);
        self
    }

    pub(crate) fn with_transaction(self, signature: &str, result: Value) -> Self {
        self.with_transaction_responses(signature, vec![Ok(result)])
    }

    pub(crate) fn with_transaction_responses(
        self,
        signature: &str,
        responses: Vec<Result<Value, RpcError>>,
    ) -> Self {
        self.transactions
            .lock()
            .unwrap()
            .insert(signature.to_string(), responses.into());
        self
    }

    pub(crate) fn transaction_lookups(&self, signature: &str) -> usize {
        self.lookups.lock().unwrap().get(signature).copied().unwrap_or(0)
    }

    pub(crate) fn listings(&self) -> usize {
        self.listings.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RpcTransport for ScriptedRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        assert_eq!(params[1]["maxSupportedTransactionVersion"], 0);
        assert_eq!(params[1]["encoding"], "jsonParsed");

        match method {
            GET_SIGNATURES_FOR_ADDRESS => {
                self.listings.fetch_add(1, Ordering::Relaxed);
                self.signatures.clone()
            }
            GET_TRANSACTION => {
                let signature = params[0].as_str().unwrap_or_default().to_string();
                *self.lookups.lock().unwrap().entry(signature.clone()).or_insert(0) += 1;

                let mut transactions = self.transactions.lock().unwrap();
                match transactions.get_mut(&signature) {
                    Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Ok(Value::Null)),
                    Some(queue) => queue.front().cloned().unwrap_or(Ok(Value::Null)),
                    None => Ok(Value::Null),
                }
            }
            other => Err(RpcError::Node {
                code: -32601,
                message: format!("Method not found: {}", other),
            }),
        }
    }
}

/// `getTransaction` result in jsonParsed shape: signer accounts first, then
/// the rest, one instruction per program id.
pub(crate) fn transaction_json(signers: &[&str], others: &[&str], programs: &[&str]) -> Value {
    let account_keys: Vec<Value> = signers
        .iter()
        .map(|pubkey| json!({ "pubkey": pubkey, "signer": true, "writable": true, "source": "transaction" }))
        .chain(others.iter().map(|pubkey| {
            json!({ "pubkey": pubkey, "signer": false, "writable": false, "source": "transaction" })
        }))
        .collect();

    let instructions: Vec<Value> = programs
        .iter()
        .map(|program_id| json!({ "programId": program_id, "accounts": [], "data": "" }))
        .collect();

    json!({
        "slot": 100,
        "blockTime": 1_700_000_000,
        "meta": { "err": null },
        "transaction": {
            "signatures": signers.first().map(|s| vec![s.to_string()]).unwrap_or_default(),
            "message": {
                "accountKeys": account_keys,
                "instructions": instructions
            }
        }
    })
}

/// `getSignaturesForAddress` result from `(signature, slot)` pairs, newest first.
pub(crate) fn signature_list(entries: &[(&str, u64)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(signature, slot)| {
                json!({ "signature": signature, "slot": slot, "err": null, "memo": null, "blockTime": null })
            })
            .collect(),
    )
}

pub(crate) fn aggregator(rpc: &Arc<ScriptedRpc>) -> CreationSlotAggregator {
    let retry = RetryPolicy {
        max_retries: 0,
        delay: Duration::ZERO,
    };
    build_aggregator(rpc.clone(), retry, ProgramScope::FirstInstruction)
}

#[tokio::test]
async fn test_single_transaction_creation_slot() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .with_signatures(signature_list(&[("A", 100)]))
            .with_transaction("A", transaction_json(&["Dev1", "Dev2"], &["Mint"], &["Pump1"])),
    );

    let result = aggregator(&rpc).analyze("Mint").await.unwrap();

    assert_eq!(result.creation_slot, 100);
    assert_eq!(result.creation_transactions, 1);
    assert_eq!(result.multi_signer_transactions, 1);
    assert!(result.block0_detected());
    assert_eq!(rpc.listings(), 1);
}

#[tokio::test]
async fn test_no_history_is_fatal() {
    let rpc = Arc::new(ScriptedRpc::new().with_signatures(json!([])));

    let err = aggregator(&rpc).analyze("Mint").await.unwrap_err();

    assert_eq!(err, AnalysisError::NoHistory("Mint".to_string()));
    assert_eq!(rpc.transaction_lookups("A"), 0);
}

#[tokio::test]
async fn test_mixed_slots_only_scan_creation_slot() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .with_signatures(signature_list(&[("A", 105), ("B", 100), ("C", 100)]))
            .with_transaction("A", transaction_json(&["Late1", "Late2"], &[], &["Other"]))
            .with_transaction("B", transaction_json(&["Dev1"], &[], &["Pump1"]))
            .with_transaction("C", transaction_json(&["Dev2"], &[], &["Pump1"])),
    );

    let result = aggregator(&rpc).analyze("Mint").await.unwrap();

    assert_eq!(result.creation_slot, 100);
    assert_eq!(result.creation_transactions, 2);
    assert_eq!(result.multi_signer_transactions, 0);
    assert!(!result.block0_detected());
    assert!(!result.signers.contains("Late1"));
    assert_eq!(rpc.transaction_lookups("A"), 0);
}

#[tokio::test]
async fn test_analyze_is_idempotent() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .with_signatures(signature_list(&[("C", 101), ("B", 100), ("A", 100)]))
            .with_transaction("A", transaction_json(&["Dev1", "Dev2"], &["Mint"], &["Pump1", "Token1"]))
            .with_transaction("B", transaction_json(&["Dev3"], &[], &["Token1"])),
    );
    let aggregator = aggregator(&rpc);

    let first = aggregator.analyze("Mint").await.unwrap();
    let second = aggregator.analyze("Mint").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(rpc.listings(), 2);
}

#[tokio::test]
async fn test_failed_fetch_does_not_halt_scan() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .with_signatures(signature_list(&[("A", 100), ("B", 100), ("C", 100)]))
            .with_transaction("A", transaction_json(&["Dev1"], &[], &["Pump1"]))
            .with_transaction_responses("B", vec![Err(RpcError::Transport("reset".to_string()))])
            .with_transaction("C", json!({ "transaction": { "message": {} } })),
    );

    let result = aggregator(&rpc).analyze("Mint").await.unwrap();

    assert_eq!(result.creation_transactions, 3);
    assert_eq!(result.unresolved_transactions, 2);
    assert_eq!(result.signers.len(), 1);
    assert_eq!(result.program_ids.len(), 1);
}
