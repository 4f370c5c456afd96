/// Token display metadata
///
/// Maps a mint to a symbol and name. The table of known tokens is built once
/// (from defaults or config) and shared read-only; unknown mints get a
/// deterministic placeholder instead of an error.
use crate::config::KnownTokenConfig;
use crate::constants::DEFAULT_KNOWN_TOKENS;
use crate::errors::{AnalyzerError, AnalyzerResult};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDisplayInfo {
    pub symbol: String,
    pub name: String,
}

impl TokenDisplayInfo {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// Placeholder for a mint missing from the known-token table
    pub fn unknown(mint: &Pubkey, decimals: u8) -> Self {
        let prefix: String = mint.to_string().chars().take(4).collect();
        Self {
            symbol: format!("Token-{}", prefix),
            name: format!("Unknown Token ({} decimals)", decimals),
        }
    }
}

/// Read-only mint -> display info table
#[derive(Debug, Clone, Default)]
pub struct KnownTokenTable {
    tokens: HashMap<Pubkey, TokenDisplayInfo>,
}

impl KnownTokenTable {
    /// Empty table; every mint resolves to a placeholder
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrapped SOL and USDC
    pub fn with_defaults() -> Self {
        DEFAULT_KNOWN_TOKENS
            .iter()
            .filter_map(|(mint, symbol, name)| {
                Pubkey::from_str(mint)
                    .ok()
                    .map(|mint| (mint, TokenDisplayInfo::new(*symbol, *name)))
            })
            .fold(Self::new(), |table, (mint, info)| table.with_token(mint, info))
    }

    pub fn from_config(entries: &[KnownTokenConfig]) -> AnalyzerResult<Self> {
        entries.iter().try_fold(Self::new(), |table, entry| {
            let mint = Pubkey::from_str(&entry.mint).map_err(|e| AnalyzerError::InvalidAddress {
                address: entry.mint.clone(),
                reason: e.to_string(),
            })?;
            Ok(table.with_token(mint, TokenDisplayInfo::new(&entry.symbol, &entry.name)))
        })
    }

    pub fn with_token(mut self, mint: Pubkey, info: TokenDisplayInfo) -> Self {
        self.tokens.insert(mint, info);
        self
    }

    pub fn get(&self, mint: &Pubkey) -> Option<&TokenDisplayInfo> {
        self.tokens.get(mint)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TokenMetadataResolver {
    table: Arc<KnownTokenTable>,
}

impl TokenMetadataResolver {
    pub fn new(table: KnownTokenTable) -> Self {
        Self::shared(Arc::new(table))
    }

    pub fn shared(table: Arc<KnownTokenTable>) -> Self {
        Self { table }
    }

    /// Never fails: unknown mints get `Token-<first 4 chars>` / `Unknown Token (<n> decimals)`
    pub fn resolve(&self, mint: &Pubkey, decimals: u8) -> TokenDisplayInfo {
        self.table
            .get(mint)
            .cloned()
            .unwrap_or_else(|| TokenDisplayInfo::unknown(mint, decimals))
    }
}

impl Default for TokenMetadataResolver {
    fn default() -> Self {
        Self::new(KnownTokenTable::with_defaults())
    }
}
