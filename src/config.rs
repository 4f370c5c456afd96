use crate::constants::{
    DEFAULT_KNOWN_TOKENS, DEFAULT_PRICE_SIGNIFICANT_DIGITS, DEFAULT_RPC_TIMEOUT_SECS,
    DEFAULT_RPC_URL,
};
use crate::errors::{AnalyzerError, AnalyzerResult};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    /// processed | confirmed | finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub include_vault_balances: bool,
    #[serde(default = "default_true")]
    pub record_performance: bool,
    #[serde(default = "default_price_significant_digits")]
    pub price_significant_digits: u32,
    #[serde(default = "default_known_tokens")]
    pub known_tokens: Vec<KnownTokenConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownTokenConfig {
    pub mint: String,
    pub symbol: String,
    pub name: String,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_rpc_timeout_secs() -> u64 {
    DEFAULT_RPC_TIMEOUT_SECS
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_price_significant_digits() -> u32 {
    DEFAULT_PRICE_SIGNIFICANT_DIGITS
}

fn default_known_tokens() -> Vec<KnownTokenConfig> {
    DEFAULT_KNOWN_TOKENS
        .iter()
        .map(|(mint, symbol, name)| KnownTokenConfig {
            mint: mint.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: default_commitment(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            output_dir: default_output_dir(),
            include_vault_balances: false,
            record_performance: true,
            price_significant_digits: default_price_significant_digits(),
            known_tokens: default_known_tokens(),
        }
    }
}

impl Config {
    /// Load from `path`, writing a default config there first if it does not exist
    pub fn load(path: &str) -> AnalyzerResult<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalyzerError::Config(format!("Failed to parse config file {}: {}", path, e))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> AnalyzerResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            AnalyzerError::Config(format!("Failed to write config file {}: {}", path, e))
        })?;
        Ok(())
    }

    pub fn validate(&self) -> AnalyzerResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(AnalyzerError::Config("rpc_url is required in config".to_string()));
        }

        self.commitment_config()?;

        if self.rpc_timeout_secs == 0 {
            return Err(AnalyzerError::Config("rpc_timeout_secs must be at least 1".to_string()));
        }

        for token in &self.known_tokens {
            Pubkey::from_str(&token.mint).map_err(|e| {
                AnalyzerError::Config(format!("known token mint '{}': {}", token.mint, e))
            })?;
        }

        Ok(())
    }

    pub fn commitment_config(&self) -> AnalyzerResult<CommitmentConfig> {
        match self.commitment.to_lowercase().as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(AnalyzerError::Config(format!(
                "unknown commitment '{}' (expected processed, confirmed or finalized)",
                other
            ))),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        let config = Config::load(path).unwrap();
        assert!(Path::new(path).exists());
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.known_tokens.len(), 2);
        assert!(!config.include_vault_balances);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "rpc_url": "http://localhost:8899", "include_vault_balances": true }"#)
            .unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert!(config.include_vault_balances);
        assert_eq!(config.commitment, "confirmed");
        assert_eq!(config.price_significant_digits, DEFAULT_PRICE_SIGNIFICANT_DIGITS);
        assert!(config.record_performance);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "rpc_url": "http://localhost:8899", "commitment": "eventually" }"#)
            .unwrap();
        assert!(matches!(
            Config::load(path.to_str().unwrap()),
            Err(AnalyzerError::Config(_))
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Config::load(path.to_str().unwrap()),
            Err(AnalyzerError::Config(_))
        ));

        let config = Config {
            known_tokens: vec![KnownTokenConfig {
                mint: "xyz".to_string(),
                symbol: "X".to_string(),
                name: "X".to_string(),
            }],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_commitment_mapping() {
        let mut config = Config::default();
        assert_eq!(config.commitment_config().unwrap(), CommitmentConfig::confirmed());
        config.commitment = "Finalized".to_string();
        assert_eq!(config.commitment_config().unwrap(), CommitmentConfig::finalized());
    }

    #[test]
    fn test_zero_digits_means_exact_price() {
        let config = Config {
            price_significant_digits: 0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "rpc_url": "http://localhost:8899", "price_significant_digits": 0 }"#).unwrap();
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.price_significant_digits, 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.output_dir = "reports".to_string();
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.output_dir, "reports");
    }
}
