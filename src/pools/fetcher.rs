/// Account fetching for pool analysis
///
/// `AccountFetcher` is the seam between the analyzer and the chain. The RPC
/// implementation batches with getMultipleAccounts; the static implementation
/// serves accounts from memory (tests and the `--account-file` CLI mode).
use crate::config::Config;
use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::logger::{self, LogTag};
use crate::pools::types::RawAccount;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Maximum number of accounts to fetch in one get_multiple_accounts call
const RPC_MULTIPLE_ACCOUNTS_BATCH_SIZE: usize = 100;

#[async_trait]
pub trait AccountFetcher: Send + Sync {
    /// `Ok(None)` when the account does not exist
    async fn fetch_account(&self, address: &Pubkey) -> AnalyzerResult<Option<RawAccount>>;

    /// Results are in the same order as `addresses`
    async fn fetch_accounts(&self, addresses: &[Pubkey]) -> AnalyzerResult<Vec<Option<RawAccount>>> {
        let mut accounts = Vec::with_capacity(addresses.len());
        for address in addresses {
            accounts.push(self.fetch_account(address).await?);
        }
        Ok(accounts)
    }
}

// =============================================================================
// RPC FETCHER
// =============================================================================

pub struct RpcAccountFetcher {
    rpc_client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcAccountFetcher {
    pub fn new(rpc_url: &str, timeout: Duration, commitment: CommitmentConfig) -> Self {
        Self {
            rpc_client: RpcClient::new_with_timeout_and_commitment(
                rpc_url.to_string(),
                timeout,
                commitment,
            ),
            commitment,
        }
    }

    pub fn from_config(config: &Config) -> AnalyzerResult<Self> {
        Ok(Self::new(
            &config.rpc_url,
            config.rpc_timeout(),
            config.commitment_config()?,
        ))
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[async_trait]
impl AccountFetcher for RpcAccountFetcher {
    async fn fetch_account(&self, address: &Pubkey) -> AnalyzerResult<Option<RawAccount>> {
        let start_time = Instant::now();
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| AnalyzerError::Rpc(format!("getAccountInfo {}: {}", address, e)))?;

        logger::debug(
            LogTag::Rpc,
            &format!(
                "getAccountInfo {} at slot {} ({}ms, found={})",
                address,
                response.context.slot,
                start_time.elapsed().as_millis(),
                response.value.is_some()
            ),
        );

        Ok(response
            .value
            .map(|account| RawAccount::from_account(*address, account)))
    }

    async fn fetch_accounts(&self, addresses: &[Pubkey]) -> AnalyzerResult<Vec<Option<RawAccount>>> {
        let mut result = Vec::with_capacity(addresses.len());

        for chunk in addresses.chunks(RPC_MULTIPLE_ACCOUNTS_BATCH_SIZE) {
            let start_time = Instant::now();
            let response = self
                .rpc_client
                .get_multiple_accounts_with_commitment(chunk, self.commitment)
                .await
                .map_err(|e| {
                    AnalyzerError::Rpc(format!(
                        "getMultipleAccounts for {} accounts: {}",
                        chunk.len(),
                        e
                    ))
                })?;

            logger::debug(
                LogTag::Rpc,
                &format!(
                    "getMultipleAccounts {} keys at slot {} ({}ms)",
                    chunk.len(),
                    response.context.slot,
                    start_time.elapsed().as_millis()
                ),
            );

            result.extend(
                chunk
                    .iter()
                    .zip(response.value)
                    .map(|(address, account)| {
                        account.map(|account| RawAccount::from_account(*address, account))
                    }),
            );
        }

        Ok(result)
    }
}

// =============================================================================
// STATIC FETCHER
// =============================================================================

/// In-memory account source
#[derive(Debug, Clone, Default)]
pub struct StaticAccountFetcher {
    accounts: HashMap<Pubkey, RawAccount>,
}

impl StaticAccountFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: RawAccount) -> Self {
        self.insert(account);
        self
    }

    pub fn insert(&mut self, account: RawAccount) {
        self.accounts.insert(account.pubkey, account);
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountFetcher for StaticAccountFetcher {
    async fn fetch_account(&self, address: &Pubkey) -> AnalyzerResult<Option<RawAccount>> {
        Ok(self.accounts.get(address).cloned())
    }
}
