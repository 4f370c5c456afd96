/// Error handling for the CLMM analyzer
///
/// Two layers:
/// - `ClmmError`: failures of the pure decode / math core. Surfaced immediately, never retried.
/// - `AnalyzerError`: everything around the core (RPC, config, files) plus wrapped core errors.
use thiserror::Error;

// =============================================================================
// CORE ERROR TYPES
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClmmError {
    /// Account buffer too short or structurally invalid
    #[error("Malformed account data: {reason}")]
    MalformedAccountData { reason: String },

    /// Numeric field outside its representable domain
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Tick {tick} outside legal range [{min}, {max}]")]
    TickOutOfRange { tick: i64, min: i32, max: i32 },
}

impl ClmmError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ClmmError::MalformedAccountData {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ClmmError::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type ClmmResult<T> = std::result::Result<T, ClmmError>;

// =============================================================================
// ANALYZER ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    Clmm(#[from] ClmmError),

    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;
