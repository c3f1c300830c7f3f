use crate::extractor::ProgramScope;
use crate::report::OutputFormat;
use crate::retry::RetryPolicy;
use solana_pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

pub const USAGE: &str = "Usage: block0_scan <MINT_ADDRESS> [--rpc-url <URL>] [--max-retries <N>] \
[--retry-delay <SECS>] [--timeout <SECS>] [--format text|json] [--all-programs]";

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing configuration: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for one scan, from command-line flags with environment
/// variables as fallback.
///
/// | Flag             | Variable           | Default |
/// |------------------|--------------------|---------|
/// | `<MINT>`/`--mint`| -                  | required |
/// | `--rpc-url`      | `RPC_URL`          | required |
/// | `--max-retries`  | `MAX_RETRIES`      | 3 |
/// | `--retry-delay`  | `RETRY_DELAY_SECS` | 5 |
/// | `--timeout`      | `RPC_TIMEOUT_SECS` | 30 |
/// | `--format`       | `OUTPUT_FORMAT`    | text |
/// | `--all-programs` | `PROGRAM_SCOPE=all`| first instruction only |
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub target_mint: String,
    pub rpc_url: String,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub output_format: OutputFormat,
    pub program_scope: ProgramScope,
    pub rust_log: String,
}

impl ScanConfig {
    pub fn from_env_and_args() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// `args` excludes the program name.
    pub fn from_sources<F>(args: &[String], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| {
            args.windows(2)
                .find(|w| w[0] == name)
                .map(|w| w[1].clone())
        };

        let target_mint = flag("--mint")
            .or_else(|| positional(args))
            .ok_or_else(|| ConfigError::MissingVariable(format!("mint address. {}", USAGE)))?;

        Pubkey::from_str(&target_mint)
            .map_err(|_| ConfigError::InvalidValue(format!("invalid mint address: {}", target_mint)))?;

        let rpc_url = flag("--rpc-url")
            .or_else(|| env("RPC_URL"))
            .ok_or_else(|| ConfigError::MissingVariable("RPC_URL".to_string()))?;

        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "RPC_URL must start with http:// or https://".to_string(),
            ));
        }

        let max_retries: u32 =
            parse_number(flag("--max-retries").or_else(|| env("MAX_RETRIES")), "MAX_RETRIES", 3)?;
        let retry_delay_secs: u64 = parse_number(
            flag("--retry-delay").or_else(|| env("RETRY_DELAY_SECS")),
            "RETRY_DELAY_SECS",
            5,
        )?;
        let timeout_secs: u64 = parse_number(
            flag("--timeout").or_else(|| env("RPC_TIMEOUT_SECS")),
            "RPC_TIMEOUT_SECS",
            30,
        )?;

        let output_format = match flag("--format").or_else(|| env("OUTPUT_FORMAT")) {
            Some(s) => s.parse::<OutputFormat>().map_err(ConfigError::InvalidValue)?,
            None => OutputFormat::default(),
        };

        let all_programs = args.iter().any(|a| a == "--all-programs")
            || env("PROGRAM_SCOPE").is_some_and(|s| s.eq_ignore_ascii_case("all"));
        let program_scope = if all_programs {
            ProgramScope::AllInstructions
        } else {
            ProgramScope::FirstInstruction
        };

        let rust_log = env("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            target_mint,
            rpc_url,
            retry: RetryPolicy {
                max_retries,
                delay: Duration::from_secs(retry_delay_secs),
            },
            request_timeout: Duration::from_secs(timeout_secs),
            output_format,
            program_scope,
            rust_log,
        })
    }
}

const VALUE_FLAGS: [&str; 6] = [
    "--mint",
    "--rpc-url",
    "--max-retries",
    "--retry-delay",
    "--timeout",
    "--format",
];

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<String> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(arg.clone());
    }
    None
}

fn parse_number<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(s) => s
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(format!("{} must be a non-negative integer, got '{}'", name, s))),
        None => Ok(default),
    }
}
