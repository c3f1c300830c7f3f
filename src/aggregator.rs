//! Creation-Slot Aggregator
//!
//! Lists every signature touching the target address, takes the slot of the
//! oldest one as the creation slot, and folds signers and program ids of all
//! transactions in that slot into an [`AggregateResult`].
//!
//! The node returns signatures newest-first, so the last entry is the oldest.
//! Only one `getSignaturesForAddress` page is requested; for busy addresses the
//! returned history may not reach back to the real creation slot.

use crate::extractor::TransactionExtractor;
use crate::rpc::{lookup_options, RpcError, RpcTransport, SignatureEntry, GET_SIGNATURES_FOR_ADDRESS};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Errors that abort a whole analysis run.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The address has no signature history, so there is no creation slot.
    NoHistory(String),
    /// Listing signatures failed.
    Rpc(RpcError),
    /// The signature list came back in an unexpected shape.
    InvalidSignatureList(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::NoHistory(address) => {
                write!(f, "No signature history found for {}", address)
            }
            AnalysisError::Rpc(e) => write!(f, "Failed to list signatures: {}", e),
            AnalysisError::InvalidSignatureList(msg) => {
                write!(f, "Invalid signature list: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<RpcError> for AnalysisError {
    fn from(e: RpcError) -> Self {
        AnalysisError::Rpc(e)
    }
}

/// Snapshot of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub address: String,
    pub creation_slot: u64,
    /// Unix timestamp of the oldest signature, when the node reported one.
    pub creation_block_time: Option<i64>,
    pub signers: BTreeSet<String>,
    pub program_ids: BTreeSet<String>,
    pub creation_transactions: usize,
    pub multi_signer_transactions: usize,
    /// Creation-slot transactions whose detail could not be fetched.
    pub unresolved_transactions: usize,
}

impl AggregateResult {
    /// Block-0 Method: at least one creation-slot transaction was co-signed by
    /// more than one wallet.
    pub fn block0_detected(&self) -> bool {
        self.multi_signer_transactions > 0
    }
}

/// Running totals while scanning the creation slot.
#[derive(Debug, Default)]
struct SlotTally {
    signers: BTreeSet<String>,
    program_ids: BTreeSet<String>,
    creation_transactions: usize,
    multi_signer_transactions: usize,
    unresolved_transactions: usize,
}

#[derive(Clone)]
pub struct CreationSlotAggregator {
    rpc: Arc<dyn RpcTransport>,
    extractor: TransactionExtractor,
}

impl CreationSlotAggregator {
    pub fn new(rpc: Arc<dyn RpcTransport>, extractor: TransactionExtractor) -> Self {
        Self { rpc, extractor }
    }

    /// Single `getSignaturesForAddress` call, newest-first.
    pub async fn list_signatures(&self, address: &str) -> Result<Vec<SignatureEntry>, AnalysisError> {
        let params = json!([address, lookup_options()]);
        let result = self.rpc.call(GET_SIGNATURES_FOR_ADDRESS, params).await?;
        parse_signature_list(result)
    }

    pub async fn analyze(&self, address: &str) -> Result<AggregateResult, AnalysisError> {
        log::info!("🔎 Listing signatures for {}", address);
        let entries = self.list_signatures(address).await?;

        let (creation_slot, creation_block_time) = match entries.last() {
            Some(oldest) => (oldest.slot, oldest.block_time),
            None => return Err(AnalysisError::NoHistory(address.to_string())),
        };

        let in_slot = entries.iter().filter(|e| e.slot == creation_slot).count();
        log::info!(
            "🧱 Creation slot {} ({} of {} signatures)",
            creation_slot,
            in_slot,
            entries.len()
        );

        let mut tally = SlotTally::default();

        for entry in entries.iter().filter(|e| e.slot == creation_slot) {
            tally.creation_transactions += 1;

            let extracted = self.extractor.extract(&entry.signature).await;

            if !extracted.resolved {
                tally.unresolved_transactions += 1;
            }
            if extracted.signers.len() > 1 {
                tally.multi_signer_transactions += 1;
                log::info!(
                    "👥 {} signed by {} wallets",
                    entry.signature,
                    extracted.signers.len()
                );
            }

            tally.signers.extend(extracted.signers);
            tally.program_ids.extend(extracted.program_ids);
        }

        if tally.unresolved_transactions > 0 {
            log::warn!(
                "⚠️  {} of {} creation-slot transactions could not be fetched",
                tally.unresolved_transactions,
                tally.creation_transactions
            );
        }

        Ok(AggregateResult {
            address: address.to_string(),
            creation_slot,
            creation_block_time,
            signers: tally.signers,
            program_ids: tally.program_ids,
            creation_transactions: tally.creation_transactions,
            multi_signer_transactions: tally.multi_signer_transactions,
            unresolved_transactions: tally.unresolved_transactions,
        })
    }
}

/// Decode a `getSignaturesForAddress` result. `null` means no history.
pub fn parse_signature_list(result: Value) -> Result<Vec<SignatureEntry>, AnalysisError> {
    if result.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(result).map_err(|e| AnalysisError::InvalidSignatureList(e.to_string()))
}
