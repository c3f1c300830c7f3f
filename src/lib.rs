//! Block-0 scanner.
//!
//! Looks at the creation slot of a token mint and checks whether any of the
//! transactions in that slot were co-signed by several wallets, a pattern used
//! to bootstrap supply across many wallets in the very first block.
//!
//! ```text
//! CreationSlotAggregator ── getSignaturesForAddress
//!     │ (per signature in the creation slot)
//!     ▼
//! TransactionExtractor → signers, program ids
//!     │
//!     ▼
//! TransactionFetcher ── getTransaction (bounded retry)
//! ```

#[cfg(test)]
mod tests;

pub mod aggregator;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod report;
pub mod retry;
pub mod rpc;

pub use aggregator::{AggregateResult, AnalysisError, CreationSlotAggregator};
pub use config::{ConfigError, ScanConfig};
pub use extractor::{ExtractedTransaction, ProgramScope, TransactionExtractor};
pub use fetcher::{FetchError, TransactionFetcher};
pub use report::OutputFormat;
pub use retry::RetryPolicy;
pub use rpc::{HttpRpcClient, RpcError, RpcTransport};

use std::sync::Arc;

/// Wire fetcher, extractor and aggregator over one transport.
pub fn build_aggregator(
    rpc: Arc<dyn RpcTransport>,
    retry: RetryPolicy,
    scope: ProgramScope,
) -> CreationSlotAggregator {
    let fetcher = TransactionFetcher::new(rpc.clone(), retry);
    let extractor = TransactionExtractor::new(fetcher, scope);
    CreationSlotAggregator::new(rpc, extractor)
}
