//! Transaction Fetcher
//!
//! Looks up one transaction by signature. Right after a slot is produced the
//! node may not have indexed its transactions yet, so an empty answer is
//! retried a bounded number of times with a constant delay.

use crate::retry::{FixedDelay, RetryPolicy};
use crate::rpc::{lookup_options, RpcError, RpcTransport, TransactionDetail, GET_TRANSACTION};
use serde_json::{json, Value};
use std::sync::Arc;

/// Why no transaction detail could be produced for a signature.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Node kept answering without a result after every retry.
    NotIndexed { lookups: u32 },
    /// Connection, HTTP or envelope failure. Not retried.
    Transport(RpcError),
    /// A result was returned but does not have the expected shape.
    Malformed(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotIndexed { lookups } => {
                write!(f, "Transaction not found after {} lookups", lookups)
            }
            FetchError::Transport(e) => write!(f, "Transport failure: {}", e),
            FetchError::Malformed(msg) => write!(f, "Malformed transaction: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Clone)]
pub struct TransactionFetcher {
    rpc: Arc<dyn RpcTransport>,
    policy: RetryPolicy,
}

impl TransactionFetcher {
    pub fn new(rpc: Arc<dyn RpcTransport>, policy: RetryPolicy) -> Self {
        Self { rpc, policy }
    }

    /// Fetch the parsed transaction for `signature`.
    ///
    /// Makes at most `max_retries + 1` lookups. A missing or empty result and a
    /// node error are retried; transport failures and undecodable results return
    /// immediately.
    pub async fn fetch(&self, signature: &str) -> Result<TransactionDetail, FetchError> {
        let mut retry = FixedDelay::new(self.policy);

        loop {
            let params = json!([signature, lookup_options()]);

            match self.rpc.call(GET_TRANSACTION, params).await {
                Ok(result) if is_empty_result(&result) => {}
                Ok(result) => {
                    return serde_json::from_value(result)
                        .map_err(|e| FetchError::Malformed(e.to_string()));
                }
                Err(e) if e.is_node_error() => {
                    log::debug!("⚠️  {} while fetching {}", e, signature);
                }
                Err(e) => return Err(FetchError::Transport(e)),
            }

            let lookups = retry.attempts() + 1;
            if retry.attempts() < retry.max_retries() {
                log::warn!(
                    "⏳ Transaction {} not found, retrying in {}s... (Attempt {}/{})",
                    signature,
                    retry.delay().as_secs(),
                    retry.attempts() + 1,
                    retry.max_retries()
                );
            }

            if retry.sleep().await.is_err() {
                return Err(FetchError::NotIndexed { lookups });
            }
        }
    }
}

/// Null, `false` and empty containers all mean the node has nothing for us yet.
fn is_empty_result(result: &Value) -> bool {
    match result {
        Value::Null | Value::Bool(false) => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
