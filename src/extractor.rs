//! Transaction Extractor
//!
//! Turns a fetched transaction into the two facts the aggregator folds:
//! who signed it and which program it invoked.

use crate::fetcher::{FetchError, TransactionFetcher};
use crate::rpc::TransactionDetail;

/// Which instructions contribute program ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramScope {
    /// Only the first instruction, usually the program that created the mint.
    #[default]
    FirstInstruction,
    /// Every top-level instruction, in order, without repeats.
    AllInstructions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTransaction {
    pub signers: Vec<String>,
    pub program_ids: Vec<String>,
    /// False when the fetch failed and the lists are empty for that reason.
    pub resolved: bool,
}

impl ExtractedTransaction {
    fn unresolved() -> Self {
        Self::default()
    }
}

/// Signer addresses in account order. Empty when no account is flagged signer.
pub fn extract_signers(detail: &TransactionDetail) -> Vec<String> {
    detail
        .transaction
        .message
        .account_keys
        .iter()
        .filter(|account| account.signer)
        .map(|account| account.pubkey.clone())
        .collect()
}

pub fn extract_program_ids(detail: &TransactionDetail, scope: ProgramScope) -> Vec<String> {
    let instructions = &detail.transaction.message.instructions;

    match scope {
        ProgramScope::FirstInstruction => instructions
            .first()
            .and_then(|ix| ix.program_id.clone())
            .into_iter()
            .collect(),
        ProgramScope::AllInstructions => {
            let mut program_ids: Vec<String> = Vec::new();
            for program_id in instructions.iter().filter_map(|ix| ix.program_id.as_ref()) {
                if !program_ids.contains(program_id) {
                    program_ids.push(program_id.clone());
                }
            }
            program_ids
        }
    }
}

#[derive(Clone)]
pub struct TransactionExtractor {
    fetcher: TransactionFetcher,
    scope: ProgramScope,
}

impl TransactionExtractor {
    pub fn new(fetcher: TransactionFetcher, scope: ProgramScope) -> Self {
        Self { fetcher, scope }
    }

    /// Fetch `signature` and extract its signers and program ids.
    ///
    /// A failed fetch never propagates: it is logged and the transaction
    /// contributes nothing.
    pub async fn extract(&self, signature: &str) -> ExtractedTransaction {
        let detail = match self.fetcher.fetch(signature).await {
            Ok(detail) => detail,
            Err(e) => {
                match &e {
                    FetchError::NotIndexed { .. } => {
                        log::warn!("⚠️  Skipping {}: {}", signature, e)
                    }
                    FetchError::Transport(_) => {
                        log::error!("❌ Skipping {}: {}", signature, e)
                    }
                    FetchError::Malformed(_) => {
                        log::error!("❌ Skipping {} (unexpected shape): {}", signature, e)
                    }
                }
                return ExtractedTransaction::unresolved();
            }
        };

        let extracted = ExtractedTransaction {
            signers: extract_signers(&detail),
            program_ids: extract_program_ids(&detail, self.scope),
            resolved: true,
        };

        log::debug!(
            "🔍 {}: {} signer(s), program(s) {:?}",
            signature,
            extracted.signers.len(),
            extracted.program_ids
        );

        extracted
    }
}
