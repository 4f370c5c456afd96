use anyhow::{Context, Result};
use clap::{Args, Parser};
use clmm_analyzer::arguments::get_enabled_debug_modes;
use clmm_analyzer::config::Config;
use clmm_analyzer::constants::{DEFAULT_CONFIG_PATH, RAYDIUM_CLMM_PROGRAM_ID};
use clmm_analyzer::logger::{self, LogTag};
use clmm_analyzer::output::{default_output_path, print_summary, write_report_json};
use clmm_analyzer::pools::{
    parse_address, ClmmPoolAnalyzer, PoolAnalysis, RawAccount, RpcAccountFetcher,
    StaticAccountFetcher,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clmm-analyzer")]
#[command(about = "Decode a Raydium CLMM pool and report its tokens and current price", long_about = None)]
struct Cli {
    /// Pool account address (base58)
    pool_id: String,

    /// RPC endpoint, overrides the config file
    #[arg(long, value_name = "URL")]
    rpc: Option<String>,

    /// Config file, created with defaults when missing
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Output JSON path (default: <output_dir>/pool_<POOL_ID>.json)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also fetch and report both vault balances
    #[arg(long)]
    vault_balances: bool,

    /// Leave performanceMetrics out of the output
    #[arg(long)]
    no_metrics: bool,

    /// Analyze raw pool account bytes from disk instead of fetching over RPC
    #[arg(long, value_name = "PATH")]
    account_file: Option<PathBuf>,

    /// Owner program of the account in --account-file
    #[arg(long, value_name = "PROGRAM_ID", requires = "account_file", default_value = RAYDIUM_CLMM_PROGRAM_ID)]
    owner: String,

    #[command(flatten)]
    log: LogFlags,
}

/// Logging switches; the logger reads them from the raw argument list
#[derive(Args)]
#[allow(dead_code)]
struct LogFlags {
    #[arg(long)]
    debug_rpc: bool,
    #[arg(long)]
    debug_pool: bool,
    #[arg(long)]
    debug_decoder: bool,
    #[arg(long)]
    debug_tokens: bool,
    #[arg(long)]
    debug_system: bool,
    #[arg(long)]
    debug_output: bool,
    /// Show every log line
    #[arg(long)]
    verbose: bool,
    /// Errors only
    #[arg(long)]
    quiet: bool,
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init();

    if let Err(e) = run(cli).await {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    if let Some(rpc_url) = &cli.rpc {
        config.rpc_url = rpc_url.clone();
    }
    if cli.vault_balances {
        config.include_vault_balances = true;
    }
    if cli.no_metrics {
        config.record_performance = false;
    }
    config.validate()?;

    let debug_modes = get_enabled_debug_modes();
    if !debug_modes.is_empty() {
        logger::info(
            LogTag::System,
            &format!("Debug modes: {}", debug_modes.join(", ")),
        );
    }

    let pool_id = parse_address(&cli.pool_id)?;
    logger::info(LogTag::System, &format!("Analyzing pool {}", pool_id));

    let analysis: PoolAnalysis = match &cli.account_file {
        Some(path) => {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read account file {}", path.display()))?;
            let owner = parse_address(&cli.owner)?;
            logger::info(
                LogTag::System,
                &format!("Using {} bytes from {}", data.len(), path.display()),
            );

            let fetcher =
                StaticAccountFetcher::new().with_account(RawAccount::new(pool_id, owner, data));
            ClmmPoolAnalyzer::from_config(fetcher, &config)?
                .get_pool_basic_info(&pool_id)
                .await?
        }
        None => {
            let fetcher = RpcAccountFetcher::from_config(&config)?;
            logger::info(
                LogTag::Rpc,
                &format!("Using RPC {} ({})", fetcher.url(), config.commitment),
            );
            ClmmPoolAnalyzer::from_config(fetcher, &config)?
                .get_pool_basic_info(&pool_id)
                .await?
        }
    };

    print_summary(&analysis);

    let output_path = cli
        .output
        .unwrap_or_else(|| default_output_path(&config.output_dir, &pool_id.to_string()));
    write_report_json(&output_path, &analysis)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(())
}
