/// Raydium CLMM pool analysis
///
/// - `math`: exact Q64.64 sqrt-price / tick / price conversions
/// - `decoders`: pool and vault account parsers
/// - `tokens`: display metadata for mints
/// - `report`: pool report assembly
/// - `fetcher` + `analyzer`: account retrieval and the end-to-end pipeline

pub mod analyzer;
pub mod decoders;
pub mod fetcher;
pub mod math;
pub mod report;
pub mod tokens;
pub mod types;

// Re-export main components
pub use analyzer::{parse_address, AnalyzerOptions, ClmmPoolAnalyzer, PoolAnalysis};
pub use decoders::{AccountDecoder, RaydiumClmmDecoder, TokenAccountBalance, TokenAccountDecoder};
pub use fetcher::{AccountFetcher, RpcAccountFetcher, StaticAccountFetcher};
pub use report::{PoolInfoAssembler, PoolReport, PriceReport, TokenReport};
pub use tokens::{KnownTokenTable, TokenDisplayInfo, TokenMetadataResolver};
pub use types::{DecimalPrice, PoolState, RawAccount};
