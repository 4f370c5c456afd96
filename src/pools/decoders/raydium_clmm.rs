/// Raydium CLMM (Concentrated Liquidity Market Maker) decoder
///
/// Parses the Anchor `PoolState` account of the Raydium CLMM program.
/// Field offsets follow the on-chain struct; the whole account is 1544 bytes
/// (8-byte discriminator + 1536 bytes of state).
///
/// Only structural checks happen here. Whether `tick_current` agrees with
/// `sqrt_price_x64` is left to `PoolState::tick_drift`.
use super::{
    ensure_min_len, read_discriminator, read_i32, read_i64, read_pubkey, read_u128, read_u16,
    read_u8, AccountDecoder,
};
use crate::errors::{ClmmError, ClmmResult};
use crate::pools::types::PoolState;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Full size of a CLMM `PoolState` account
pub const POOL_STATE_LEN: usize = 1544;

/// Largest token decimals accepted from a pool account
pub const MAX_TOKEN_DECIMALS: u8 = 18;

/// Byte offsets inside the `PoolState` account
pub mod offsets {
    pub const DISCRIMINATOR: usize = 0;
    pub const BUMP: usize = 8;
    pub const AMM_CONFIG: usize = 9;
    pub const OWNER: usize = 41;
    pub const TOKEN_MINT_0: usize = 73;
    pub const TOKEN_MINT_1: usize = 105;
    pub const TOKEN_VAULT_0: usize = 137;
    pub const TOKEN_VAULT_1: usize = 169;
    pub const OBSERVATION_KEY: usize = 201;
    pub const MINT_DECIMALS_0: usize = 233;
    pub const MINT_DECIMALS_1: usize = 234;
    pub const TICK_SPACING: usize = 235;
    pub const LIQUIDITY: usize = 237;
    pub const SQRT_PRICE_X64: usize = 253;
    pub const TICK_CURRENT: usize = 269;
    pub const STATUS: usize = 389;
    pub const OPEN_TIME: usize = 1080;
}

static POOL_STATE_DISCRIMINATOR: Lazy<[u8; 8]> = Lazy::new(|| anchor_discriminator("PoolState"));

/// First 8 bytes of `sha256("account:<name>")`, Anchor's account tag
pub fn anchor_discriminator(account_name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("account:{}", account_name).as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

/// Discriminator every CLMM pool account starts with
pub fn pool_state_discriminator() -> [u8; 8] {
    *POOL_STATE_DISCRIMINATOR
}

pub struct RaydiumClmmDecoder;

impl AccountDecoder for RaydiumClmmDecoder {
    type Output = PoolState;

    const MIN_LEN: usize = POOL_STATE_LEN;

    fn decode(data: &[u8]) -> ClmmResult<PoolState> {
        ensure_min_len(data, Self::MIN_LEN, "CLMM pool")?;

        let discriminator = read_discriminator(data)?;
        if discriminator != *POOL_STATE_DISCRIMINATOR {
            return Err(ClmmError::malformed(format!(
                "not a CLMM pool account: discriminator {:?} (expected {:?})",
                discriminator, *POOL_STATE_DISCRIMINATOR
            )));
        }

        let open_time = read_i64(data, offsets::OPEN_TIME, "open_time")?;

        let state = PoolState {
            bump: read_u8(data, offsets::BUMP, "bump")?,
            amm_config: read_pubkey(data, offsets::AMM_CONFIG, "amm_config")?,
            creator: read_pubkey(data, offsets::OWNER, "owner")?,
            mint_a: read_pubkey(data, offsets::TOKEN_MINT_0, "token_mint_0")?,
            mint_b: read_pubkey(data, offsets::TOKEN_MINT_1, "token_mint_1")?,
            vault_a: read_pubkey(data, offsets::TOKEN_VAULT_0, "token_vault_0")?,
            vault_b: read_pubkey(data, offsets::TOKEN_VAULT_1, "token_vault_1")?,
            observation_key: read_pubkey(data, offsets::OBSERVATION_KEY, "observation_key")?,
            decimals_a: read_u8(data, offsets::MINT_DECIMALS_0, "mint_decimals_0")?,
            decimals_b: read_u8(data, offsets::MINT_DECIMALS_1, "mint_decimals_1")?,
            tick_spacing: read_u16(data, offsets::TICK_SPACING, "tick_spacing")?,
            liquidity: read_u128(data, offsets::LIQUIDITY, "liquidity")?,
            sqrt_price_x64: read_u128(data, offsets::SQRT_PRICE_X64, "sqrt_price_x64")?,
            tick_current: read_i32(data, offsets::TICK_CURRENT, "tick_current")?,
            status: read_u8(data, offsets::STATUS, "status")?,
            start_time: (open_time > 0).then_some(open_time),
        };

        check_structure(&state)?;
        Ok(state)
    }
}

fn check_structure(state: &PoolState) -> ClmmResult<()> {
    for (field, decimals) in [
        ("mint_decimals_0", state.decimals_a),
        ("mint_decimals_1", state.decimals_b),
    ] {
        if decimals > MAX_TOKEN_DECIMALS {
            return Err(ClmmError::malformed(format!(
                "{} is {} (max {})",
                field, decimals, MAX_TOKEN_DECIMALS
            )));
        }
    }

    for (field, key) in [
        ("token_mint_0", &state.mint_a),
        ("token_mint_1", &state.mint_b),
        ("token_vault_0", &state.vault_a),
        ("token_vault_1", &state.vault_b),
    ] {
        if *key == Pubkey::default() {
            return Err(ClmmError::malformed(format!("{} is the zero address", field)));
        }
    }

    if state.mint_a == state.mint_b {
        return Err(ClmmError::malformed(format!(
            "token_mint_0 and token_mint_1 are both {}",
            state.mint_a
        )));
    }

    Ok(())
}
