/// Global constants used across the analyzer
///
/// System-wide values that are not configurable.

// ============================================================================
// SOLANA BLOCKCHAIN CONSTANTS
// ============================================================================

/// SOL token mint address (wrapped SOL / WSOL)
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// Raydium concentrated-liquidity program (mainnet)
pub const RAYDIUM_CLMM_PROGRAM_ID: &str = "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK";

// ============================================================================
// ANALYZER DEFAULTS
// ============================================================================

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

pub const DEFAULT_CONFIG_PATH: &str = "clmm_analyzer.json";

/// Significant digits of `price.current` in reports
pub const DEFAULT_PRICE_SIGNIFICANT_DIGITS: u32 = 20;

pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Placeholder written when a pool has no recorded start time
pub const UNKNOWN_START_TIME: &str = "Unknown";

/// Tokens with display metadata out of the box: (mint, symbol, name)
pub const DEFAULT_KNOWN_TOKENS: &[(&str, &str, &str)] = &[
    (SOL_MINT, "SOL", "Wrapped SOL"),
    (USDC_MINT, "USDC", "USD Coin"),
];
