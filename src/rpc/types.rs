//! Wire types for the two JSON-RPC methods the scanner calls.
//!
//! Only the fields the analysis reads are modelled. Everything else in the
//! node's response is ignored by serde.

use serde::Deserialize;
use serde_json::{json, Value};

/// Options sent with both `getSignaturesForAddress` and `getTransaction`.
///
/// `maxSupportedTransactionVersion: 0` lets the node return versioned
/// transactions without us decoding version-specific extensions.
pub fn lookup_options() -> Value {
    json!({
        "maxSupportedTransactionVersion": 0,
        "encoding": "jsonParsed"
    })
}

/// One entry of a `getSignaturesForAddress` response (newest-first).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignatureEntry {
    pub signature: String,
    pub slot: u64,
    #[serde(rename = "blockTime", default)]
    pub block_time: Option<i64>,
}

/// Decoded `getTransaction` result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionDetail {
    pub transaction: ParsedTransaction,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedTransaction {
    pub message: ParsedMessage,
}

/// `accountKeys` and `instructions` are required: a transaction without them
/// fails to decode and is reported as malformed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedMessage {
    #[serde(rename = "accountKeys")]
    pub account_keys: Vec<AccountEntry>,
    pub instructions: Vec<InstructionEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountEntry {
    pub pubkey: String,
    pub signer: bool,
}

/// Parsed and partially decoded instructions both carry `programId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstructionEntry {
    #[serde(rename = "programId", default)]
    pub program_id: Option<String>,
}
