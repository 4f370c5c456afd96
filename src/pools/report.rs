/// Pool report assembly
///
/// Joins a decoded `PoolState`, resolved token metadata and the computed price
/// into the `PoolReport` written out by the CLI. Pure; only math errors propagate.
use crate::constants::{DEFAULT_PRICE_SIGNIFICANT_DIGITS, UNKNOWN_START_TIME};
use crate::errors::ClmmResult;
use crate::pools::tokens::TokenMetadataResolver;
use crate::pools::types::{DecimalPrice, PoolState};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReport {
    pub pool_id: String,
    pub program_id: String,
    pub token_a: TokenReport,
    pub token_b: TokenReport,
    pub price: PriceReport,
    /// ISO-8601 or `"Unknown"`
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub vault: String,
    /// Whole-token vault balance, only when vault balances were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_balance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceReport {
    /// Token B per token A
    pub current: DecimalPrice,
    pub sqrt_price_x64: String,
    pub tick_current: i32,
}

pub struct PoolInfoAssembler {
    resolver: TokenMetadataResolver,
    price_significant_digits: u32,
}

impl PoolInfoAssembler {
    pub fn new(resolver: TokenMetadataResolver) -> Self {
        Self {
            resolver,
            price_significant_digits: DEFAULT_PRICE_SIGNIFICANT_DIGITS,
        }
    }

    /// `0` keeps the exact price
    pub fn with_price_significant_digits(mut self, digits: u32) -> Self {
        self.price_significant_digits = digits;
        self
    }

    pub fn assemble(
        &self,
        pool_id: &Pubkey,
        owner_program_id: &Pubkey,
        state: &PoolState,
    ) -> ClmmResult<PoolReport> {
        let current = state
            .current_price()?
            .with_significant_digits(self.price_significant_digits);

        Ok(PoolReport {
            pool_id: pool_id.to_string(),
            program_id: owner_program_id.to_string(),
            token_a: self.token_report(&state.mint_a, state.decimals_a, &state.vault_a),
            token_b: self.token_report(&state.mint_b, state.decimals_b, &state.vault_b),
            price: PriceReport {
                current,
                sqrt_price_x64: state.sqrt_price_x64.to_string(),
                tick_current: state.tick_current,
            },
            start_time: format_start_time(state.start_time),
        })
    }

    fn token_report(&self, mint: &Pubkey, decimals: u8, vault: &Pubkey) -> TokenReport {
        let info = self.resolver.resolve(mint, decimals);
        TokenReport {
            mint: mint.to_string(),
            symbol: info.symbol,
            name: info.name,
            decimals,
            vault: vault.to_string(),
            vault_balance: None,
        }
    }
}

/// ISO-8601 UTC with milliseconds, or `"Unknown"` when absent or unrepresentable
pub fn format_start_time(start_time: Option<i64>) -> String {
    start_time
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| UNKNOWN_START_TIME.to_string())
}
