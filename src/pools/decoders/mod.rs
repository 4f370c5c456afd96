/// Account decoders for Raydium CLMM pools and the SPL token vaults they reference
///
/// Decoders are pure: bytes in, typed value or `MalformedAccountData` out.
pub mod raydium_clmm;
pub mod token_account;

pub use raydium_clmm::RaydiumClmmDecoder;
pub use token_account::{TokenAccountBalance, TokenAccountDecoder};

use crate::errors::{ClmmError, ClmmResult};
use solana_sdk::pubkey::Pubkey;

/// Decoder for one fixed-layout on-chain account type
pub trait AccountDecoder {
    type Output;

    /// Smallest buffer the layout can be read from
    const MIN_LEN: usize;

    fn decode(data: &[u8]) -> ClmmResult<Self::Output>;
}

/// Reject buffers shorter than the decoder's layout
pub(crate) fn ensure_min_len(data: &[u8], min_len: usize, account: &str) -> ClmmResult<()> {
    if data.len() < min_len {
        return Err(ClmmError::malformed(format!(
            "{} data too short: {} bytes (expected >= {})",
            account,
            data.len(),
            min_len
        )));
    }
    Ok(())
}

fn read_array<const N: usize>(data: &[u8], offset: usize, field: &str) -> ClmmResult<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| data.get(offset..end))
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or_else(|| {
            ClmmError::malformed(format!(
                "{} at offset {} needs {} bytes, account has {}",
                field,
                offset,
                N,
                data.len()
            ))
        })
}

pub(crate) fn read_pubkey(data: &[u8], offset: usize, field: &str) -> ClmmResult<Pubkey> {
    read_array::<32>(data, offset, field).map(Pubkey::new_from_array)
}

pub(crate) fn read_u8(data: &[u8], offset: usize, field: &str) -> ClmmResult<u8> {
    read_array::<1>(data, offset, field).map(|bytes| bytes[0])
}

pub(crate) fn read_u16(data: &[u8], offset: usize, field: &str) -> ClmmResult<u16> {
    read_array(data, offset, field).map(u16::from_le_bytes)
}

pub(crate) fn read_i32(data: &[u8], offset: usize, field: &str) -> ClmmResult<i32> {
    read_array(data, offset, field).map(i32::from_le_bytes)
}

pub(crate) fn read_u64(data: &[u8], offset: usize, field: &str) -> ClmmResult<u64> {
    read_array(data, offset, field).map(u64::from_le_bytes)
}

pub(crate) fn read_i64(data: &[u8], offset: usize, field: &str) -> ClmmResult<i64> {
    read_array(data, offset, field).map(i64::from_le_bytes)
}

pub(crate) fn read_u128(data: &[u8], offset: usize, field: &str) -> ClmmResult<u128> {
    read_array(data, offset, field).map(u128::from_le_bytes)
}

pub(crate) fn read_discriminator(data: &[u8]) -> ClmmResult<[u8; 8]> {
    read_array(data, 0, "discriminator")
}
