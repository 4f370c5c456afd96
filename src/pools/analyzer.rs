/// End-to-end analysis of a single Raydium CLMM pool
///
/// Pipeline: fetch pool account -> decode -> (optional) fetch vault balances
/// -> assemble report. Each stage is timed with `PerformanceMonitor` markers
/// `fetchPoolInfo`, `decodePoolInfo`, `fetchTokenBalances` and `total`.
use crate::arguments::is_debug_pool_enabled;
use crate::config::Config;
use crate::constants::{DEFAULT_PRICE_SIGNIFICANT_DIGITS, RAYDIUM_CLMM_PROGRAM_ID};
use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::logger::{self, LogTag};
use crate::pools::decoders::{AccountDecoder, RaydiumClmmDecoder, TokenAccountDecoder};
use crate::pools::fetcher::AccountFetcher;
use crate::pools::report::{PoolInfoAssembler, PoolReport, TokenReport};
use crate::pools::tokens::{KnownTokenTable, TokenMetadataResolver};
use crate::pools::types::{PoolState, RawAccount};
use crate::profiling::{PerformanceMetrics, PerformanceMonitor};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const MARKER_FETCH_POOL_INFO: &str = "fetchPoolInfo";
pub const MARKER_DECODE_POOL_INFO: &str = "decodePoolInfo";
pub const MARKER_FETCH_TOKEN_BALANCES: &str = "fetchTokenBalances";
pub const MARKER_TOTAL: &str = "total";

/// Bytes of the pool account shown in `--verbose` output
const RAW_HEADER_DUMP_LEN: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub include_vault_balances: bool,
    pub record_performance: bool,
    /// `0` keeps the exact price
    pub price_significant_digits: u32,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            include_vault_balances: false,
            record_performance: true,
            price_significant_digits: DEFAULT_PRICE_SIGNIFICANT_DIGITS,
        }
    }
}

impl AnalyzerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            include_vault_balances: config.include_vault_balances,
            record_performance: config.record_performance,
            price_significant_digits: config.price_significant_digits,
        }
    }
}

/// Report plus optional stage timings, as written to the JSON output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAnalysis {
    #[serde(flatten)]
    pub report: PoolReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
}

/// Parse a base58 pool or program address
pub fn parse_address(address: &str) -> AnalyzerResult<Pubkey> {
    Pubkey::from_str(address.trim()).map_err(|e| AnalyzerError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

pub struct ClmmPoolAnalyzer<F: AccountFetcher> {
    fetcher: F,
    assembler: PoolInfoAssembler,
    options: AnalyzerOptions,
}

impl<F: AccountFetcher> ClmmPoolAnalyzer<F> {
    pub fn new(fetcher: F, resolver: TokenMetadataResolver, options: AnalyzerOptions) -> Self {
        let assembler = PoolInfoAssembler::new(resolver)
            .with_price_significant_digits(options.price_significant_digits);
        Self {
            fetcher,
            assembler,
            options,
        }
    }

    /// Known tokens and options come from the config file
    pub fn from_config(fetcher: F, config: &Config) -> AnalyzerResult<Self> {
        let table = KnownTokenTable::from_config(&config.known_tokens)?;
        logger::debug(
            LogTag::Tokens,
            &format!("Loaded {} known tokens", table.len()),
        );
        Ok(Self::new(
            fetcher,
            TokenMetadataResolver::new(table),
            AnalyzerOptions::from_config(config),
        ))
    }

    /// Fetch, decode and describe one pool
    pub async fn get_pool_basic_info(&self, pool_id: &Pubkey) -> AnalyzerResult<PoolAnalysis> {
        let mut monitor = PerformanceMonitor::new();
        monitor.start();
        monitor.mark_start(MARKER_TOTAL);

        let result = self.analyze(pool_id, &mut monitor).await;

        monitor.mark_end(MARKER_TOTAL);
        monitor.end();

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                logger::error(
                    LogTag::Pool,
                    &format!("Failed to analyze pool {}: {}", pool_id, e),
                );
                return Err(e);
            }
        };

        if is_debug_pool_enabled() {
            monitor.log_report();
        }

        Ok(PoolAnalysis {
            report,
            performance_metrics: self.options.record_performance.then(|| monitor.metrics()),
        })
    }

    async fn analyze(
        &self,
        pool_id: &Pubkey,
        monitor: &mut PerformanceMonitor,
    ) -> AnalyzerResult<PoolReport> {
        monitor.mark_start(MARKER_FETCH_POOL_INFO);
        let account = self
            .fetcher
            .fetch_account(pool_id)
            .await?
            .ok_or_else(|| AnalyzerError::AccountNotFound {
                address: pool_id.to_string(),
            })?;
        monitor.mark_end(MARKER_FETCH_POOL_INFO);

        logger::debug(
            LogTag::Pool,
            &format!(
                "Fetched pool {} ({} bytes, owner {})",
                pool_id,
                account.data.len(),
                account.owner
            ),
        );

        if let Some(header) = account.data.get(..RAW_HEADER_DUMP_LEN) {
            logger::verbose(
                LogTag::Decoder,
                &format!("Pool {} raw header: {:02x?}", pool_id, header),
            );
        }

        if account.owner.to_string() != RAYDIUM_CLMM_PROGRAM_ID {
            logger::warning(
                LogTag::Pool,
                &format!(
                    "Pool {} is owned by {}, not the Raydium CLMM program {}",
                    pool_id, account.owner, RAYDIUM_CLMM_PROGRAM_ID
                ),
            );
        }

        monitor.mark_start(MARKER_DECODE_POOL_INFO);
        let state = RaydiumClmmDecoder::decode(&account.data)?;
        check_cached_tick(pool_id, &state);
        let mut report = self.assembler.assemble(pool_id, &account.owner, &state)?;
        monitor.mark_end(MARKER_DECODE_POOL_INFO);

        logger::debug(
            LogTag::Decoder,
            &format!(
                "Pool {}: sqrt_price_x64={} tick={} liquidity={} decimals={}/{}",
                pool_id,
                state.sqrt_price_x64,
                state.tick_current,
                state.liquidity,
                state.decimals_a,
                state.decimals_b
            ),
        );

        if self.options.include_vault_balances {
            monitor.mark_start(MARKER_FETCH_TOKEN_BALANCES);
            self.attach_vault_balances(&state, &mut report).await;
            monitor.mark_end(MARKER_FETCH_TOKEN_BALANCES);
        }

        Ok(report)
    }

    /// Vault problems only cost the balance, never the report
    async fn attach_vault_balances(&self, state: &PoolState, report: &mut PoolReport) {
        let accounts = match self.fetcher.fetch_accounts(&[state.vault_a, state.vault_b]).await {
            Ok(accounts) => accounts,
            Err(e) => {
                logger::warning(
                    LogTag::Tokens,
                    &format!("Skipping vault balances, fetch failed: {}", e),
                );
                return;
            }
        };

        let mut accounts = accounts.into_iter();
        report.token_a.vault_balance = vault_balance(
            &state.vault_a,
            accounts.next().flatten(),
            &state.mint_a,
            state.decimals_a,
        );
        report.token_b.vault_balance = vault_balance(
            &state.vault_b,
            accounts.next().flatten(),
            &state.mint_b,
            state.decimals_b,
        );

        log_vault_balance(&report.token_a);
        log_vault_balance(&report.token_b);
    }
}

/// Returns whether the cached tick is within one step of the sqrt price.
/// A one-step drift is normal at tick boundaries and only shows under `--debug-decoder`.
fn check_cached_tick(pool_id: &Pubkey, state: &PoolState) -> bool {
    match state.tick_drift() {
        Ok(0) => true,
        Ok(drift) if drift.abs() <= 1 => {
            logger::debug(
                LogTag::Decoder,
                &format!(
                    "Pool {} cached tick {} is {} step from sqrt price {}",
                    pool_id, state.tick_current, drift, state.sqrt_price_x64
                ),
            );
            true
        }
        Ok(drift) => {
            logger::warning(
                LogTag::Decoder,
                &format!(
                    "Pool {} cached tick {} is {} ticks off sqrt price {}",
                    pool_id, state.tick_current, drift, state.sqrt_price_x64
                ),
            );
            false
        }
        Err(e) => {
            logger::warning(
                LogTag::Decoder,
                &format!("Pool {} tick check skipped: {}", pool_id, e),
            );
            false
        }
    }
}

fn vault_balance(
    vault: &Pubkey,
    account: Option<RawAccount>,
    expected_mint: &Pubkey,
    decimals: u8,
) -> Option<String> {
    let Some(account) = account else {
        logger::warning(LogTag::Tokens, &format!("Vault {} not found", vault));
        return None;
    };

    let balance = match TokenAccountDecoder::decode(&account.data) {
        Ok(balance) => balance,
        Err(e) => {
            logger::warning(
                LogTag::Tokens,
                &format!("Vault {} is not a token account: {}", vault, e),
            );
            return None;
        }
    };

    if balance.mint != *expected_mint {
        logger::warning(
            LogTag::Tokens,
            &format!(
                "Vault {} holds mint {}, expected {}",
                vault, balance.mint, expected_mint
            ),
        );
        return None;
    }

    Some(balance.ui_amount(decimals).to_plain_string())
}

fn log_vault_balance(token: &TokenReport) {
    if let Some(balance) = &token.vault_balance {
        logger::debug(
            LogTag::Tokens,
            &format!("Vault {} balance: {} {}", token.vault, balance, token.symbol),
        );
    }
}
