/// SPL token account decoder, used for pool vault balances
///
/// Layout (Token and Token-2022 base account): mint @0, owner @32, amount u64 LE @64.
/// Token-2022 accounts with extensions are longer; extra bytes are ignored.
use super::{ensure_min_len, read_pubkey, read_u64, AccountDecoder};
use crate::errors::ClmmResult;
use crate::pools::types::DecimalPrice;
use solana_sdk::pubkey::Pubkey;

/// Size of a base SPL token account
pub const TOKEN_ACCOUNT_LEN: usize = 165;

const MINT_OFFSET: usize = 0;
const OWNER_OFFSET: usize = 32;
const AMOUNT_OFFSET: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountBalance {
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Raw amount in the token's smallest unit
    pub amount: u64,
}

impl TokenAccountBalance {
    /// Amount in whole tokens
    pub fn ui_amount(&self, decimals: u8) -> DecimalPrice {
        DecimalPrice::from_raw_amount(self.amount, decimals)
    }
}

pub struct TokenAccountDecoder;

impl AccountDecoder for TokenAccountDecoder {
    type Output = TokenAccountBalance;

    const MIN_LEN: usize = TOKEN_ACCOUNT_LEN;

    fn decode(data: &[u8]) -> ClmmResult<TokenAccountBalance> {
        ensure_min_len(data, Self::MIN_LEN, "Token account")?;

        Ok(TokenAccountBalance {
            mint: read_pubkey(data, MINT_OFFSET, "mint")?,
            owner: read_pubkey(data, OWNER_OFFSET, "owner")?,
            amount: read_u64(data, AMOUNT_OFFSET, "amount")?,
        })
    }
}
