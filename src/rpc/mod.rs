//! JSON-RPC plumbing for the two node methods the scanner needs.
//!
//! [`RpcTransport`] is the seam between the analysis and the network: the
//! fetcher and aggregator only see `call(method, params) -> result`, so tests
//! drive them with scripted responses instead of a live node.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

pub use client::HttpRpcClient;
pub use error::RpcError;
pub use types::{lookup_options, AccountEntry, InstructionEntry, SignatureEntry, TransactionDetail};

pub const GET_SIGNATURES_FOR_ADDRESS: &str = "getSignaturesForAddress";
pub const GET_TRANSACTION: &str = "getTransaction";

#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send one request and return its `result` value (`Value::Null` when the
    /// node answered without one).
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}
