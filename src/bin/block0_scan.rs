//! Block-0 Scan - creation-slot signer analysis for a token mint
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin block0_scan -- <MINT_ADDRESS> [--format json] [--all-programs]
//! ```
//!
//! ## Environment Variables
//!
//! - `RPC_URL` - JSON-RPC endpoint (required unless `--rpc-url` is given)
//! - `MAX_RETRIES` - retries per transaction lookup (default: 3)
//! - `RETRY_DELAY_SECS` - delay between retries (default: 5)
//! - `RPC_TIMEOUT_SECS` - per-request timeout (default: 30)
//! - `OUTPUT_FORMAT` - `text` or `json` (default: text)
//! - `RUST_LOG` - log level (default: info)
//!
//! Logs go to stderr; the report goes to stdout.

use block0::{build_aggregator, report, HttpRpcClient, ScanConfig};
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = ScanConfig::from_env_and_args()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.rust_log))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("🚀 Starting Block-0 scan");
    log::info!("   Target Mint: {}", config.target_mint);
    log::info!("   RPC URL: {}", config.rpc_url);
    log::info!(
        "   Retries: {} x {}s",
        config.retry.max_retries,
        config.retry.delay.as_secs()
    );
    log::info!("   Program Scope: {:?}", config.program_scope);

    let rpc = Arc::new(HttpRpcClient::new(&config.rpc_url, config.request_timeout)?);
    let aggregator = build_aggregator(rpc, config.retry, config.program_scope);

    let result = match aggregator.analyze(&config.target_mint).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("❌ Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    log::info!(
        "✅ Scanned {} creation-slot transactions in slot {}",
        result.creation_transactions,
        result.creation_slot
    );

    print!("{}", report::render(&result, config.output_format)?);

    Ok(())
}
