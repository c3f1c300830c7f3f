//! Rendering of an [`AggregateResult`] for the terminal or for other tools.

use crate::aggregator::AggregateResult;
use chrono::DateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected text or json)", other)),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a AggregateResult,
    block0_detected: bool,
}

pub fn render(result: &AggregateResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => render_json(result),
    }
}

pub fn render_json(result: &AggregateResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        result,
        block0_detected: result.block0_detected(),
    })
}

pub fn render_text(result: &AggregateResult) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();

    out.push_str(&format!("\n{}\nANALYSIS RESULTS\n{}\n\n", rule, rule));

    out.push_str(&format!("Mint:          {}\n", result.address));
    out.push_str(&format!("Creation Slot: {}\n", result.creation_slot));
    if let Some(time) = result
        .creation_block_time
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
    {
        out.push_str(&format!("Block Time:    {}\n", time.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    out.push_str("\nUNIQUE SIGNERS:\n");
    for signer in &result.signers {
        out.push_str(&format!("  • {}\n", signer));
    }

    out.push_str("\nPROGRAM IDs:\n");
    for program_id in &result.program_ids {
        out.push_str(&format!("  • {}\n", program_id));
    }

    out.push_str("\nSTATISTICS:\n");
    out.push_str(&format!("  • Creation Slot Transactions: {}\n", result.creation_transactions));
    out.push_str(&format!("  • Total Unique Signers: {}\n", result.signers.len()));
    out.push_str(&format!("  • Total Unique Programs: {}\n", result.program_ids.len()));
    out.push_str(&format!(
        "  • Transactions with Multiple Signers: {}\n",
        result.multi_signer_transactions
    ));
    if result.unresolved_transactions > 0 {
        out.push_str(&format!(
            "  • Transactions Not Fetched: {}\n",
            result.unresolved_transactions
        ));
    }
    out.push_str(&format!("\n{}\n\n", rule));

    if result.block0_detected() {
        out.push_str("Block-0 Method Detected\n");
    }

    out
}
