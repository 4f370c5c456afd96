/// Core value types for CLMM pool analysis
///
/// Everything here is constructed once per request and never mutated afterwards.
use crate::errors::ClmmResult;
use crate::pools::math::{get_tick_from_sqrt_price_x64, sqrt_price_x64_to_price};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};
use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// POOL STATE
// =============================================================================

/// Decoded Raydium CLMM pool account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub bump: u8,
    pub amm_config: Pubkey,
    /// Account that created the pool
    pub creator: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub observation_key: Pubkey,
    pub decimals_a: u8,
    pub decimals_b: u8,
    pub tick_spacing: u16,
    pub liquidity: u128,
    /// sqrt(price of A in B) as Q64.64
    pub sqrt_price_x64: u128,
    /// Tick cached by the program; derivable from `sqrt_price_x64`
    pub tick_current: i32,
    pub status: u8,
    /// Unix seconds, `None` when the pool never recorded an open time
    pub start_time: Option<i64>,
}

impl PoolState {
    /// Current price of token A in token B, decimal adjusted
    pub fn current_price(&self) -> ClmmResult<DecimalPrice> {
        sqrt_price_x64_to_price(self.sqrt_price_x64, self.decimals_a, self.decimals_b)
    }

    /// Cached tick minus the nearest tick below the stored sqrt price.
    /// The program can leave the cached tick one step off at a tick boundary.
    pub fn tick_drift(&self) -> ClmmResult<i64> {
        let derived = get_tick_from_sqrt_price_x64(self.sqrt_price_x64)?;
        Ok(i64::from(self.tick_current) - i64::from(derived))
    }
}

// =============================================================================
// RAW ACCOUNTS
// =============================================================================

/// Account bytes as returned by a fetcher, before any decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
    pub lamports: u64,
    /// Program that owns the account
    pub owner: Pubkey,
}

impl RawAccount {
    pub fn new(pubkey: Pubkey, owner: Pubkey, data: Vec<u8>) -> Self {
        Self {
            pubkey,
            data,
            lamports: 0,
            owner,
        }
    }

    /// Create from Solana Account
    pub fn from_account(pubkey: Pubkey, account: solana_sdk::account::Account) -> Self {
        Self {
            pubkey,
            data: account.data,
            lamports: account.lamports,
            owner: account.owner,
        }
    }
}

// =============================================================================
// EXACT DECIMAL
// =============================================================================

/// Exact decimal number used for prices and token amounts
///
/// Serializes as a plain decimal string (never exponent notation).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecimalPrice(BigDecimal);

impl DecimalPrice {
    pub fn new(value: BigDecimal) -> Self {
        Self(value)
    }

    /// `amount / 10^decimals` for a raw on-chain token amount
    pub fn from_raw_amount(amount: u64, decimals: u8) -> Self {
        Self(BigDecimal::new(BigInt::from(amount), decimals as i64))
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to `digits` significant digits, ties away from zero. `0` keeps the exact value.
    pub fn with_significant_digits(&self, digits: u32) -> Self {
        let (mantissa, scale) = self.0.as_bigint_and_exponent();
        let magnitude = mantissa.magnitude();
        let length = magnitude.to_string().len() as u32;
        if digits == 0 || length <= digits {
            return self.clone();
        }

        let dropped = length - digits;
        let divisor = BigUint::from(10u32).pow(dropped);
        let quotient = magnitude / &divisor;
        let doubled_remainder = (magnitude % &divisor) << 1u32;

        let rounded = if doubled_remainder >= divisor {
            quotient + 1u32
        } else {
            quotient
        };

        let mantissa = BigInt::from_biguint(mantissa.sign(), rounded);
        Self(BigDecimal::new(mantissa, scale - dropped as i64))
    }

    /// Plain positional notation with trailing fractional zeros removed
    pub fn to_plain_string(&self) -> String {
        let (mut mantissa, mut scale) = self.0.as_bigint_and_exponent();
        if mantissa.is_zero() {
            return "0".to_string();
        }

        let ten = BigInt::from(10u32);
        while (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            scale -= 1;
        }

        let digits = mantissa.magnitude().to_string();
        let body = if scale <= 0 {
            format!("{}{}", digits, "0".repeat(scale.unsigned_abs() as usize))
        } else {
            let scale = scale as usize;
            if digits.len() > scale {
                let (integer, fraction) = digits.split_at(digits.len() - scale);
                format!("{}.{}", integer, fraction)
            } else {
                format!("0.{}{}", "0".repeat(scale - digits.len()), digits)
            }
        };

        if mantissa.is_negative() {
            format!("-{}", body)
        } else {
            body
        }
    }
}

impl fmt::Display for DecimalPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl FromStr for DecimalPrice {
    type Err = bigdecimal::ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s).map(Self)
    }
}

impl Serialize for DecimalPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(text: &str) -> DecimalPrice {
        DecimalPrice::from_str(text).unwrap()
    }

    #[test]
    fn test_plain_string_formats() {
        assert_eq!(decimal("1000").to_plain_string(), "1000");
        assert_eq!(decimal("1e3").to_plain_string(), "1000");
        assert_eq!(decimal("0.000123").to_plain_string(), "0.000123");
        assert_eq!(decimal("12.500").to_plain_string(), "12.5");
        assert_eq!(decimal("0").to_plain_string(), "0");
        assert_eq!(decimal("-0.05").to_plain_string(), "-0.05");
        assert_eq!(
            DecimalPrice::new(BigDecimal::new(BigInt::from(15u32), 40)).to_plain_string(),
            "0.0000000000000000000000000000000000000015"
        );
    }

    #[test]
    fn test_significant_digits_round_half_up() {
        assert_eq!(decimal("123.456").with_significant_digits(4).to_plain_string(), "123.5");
        assert_eq!(decimal("2.5").with_significant_digits(1).to_plain_string(), "3");
        assert_eq!(decimal("3.5").with_significant_digits(1).to_plain_string(), "4");
        assert_eq!(decimal("0.125").with_significant_digits(2).to_plain_string(), "0.13");
        assert_eq!(decimal("-2.5").with_significant_digits(1).to_plain_string(), "-3");
        assert_eq!(decimal("2.49").with_significant_digits(1).to_plain_string(), "2");
        assert_eq!(decimal("0.00012345").with_significant_digits(2).to_plain_string(), "0.00012");
        assert_eq!(decimal("9.99").with_significant_digits(2).to_plain_string(), "10");
        assert_eq!(decimal("123456").with_significant_digits(2).to_plain_string(), "120000");
        // Fewer digits than requested stays exact
        assert_eq!(decimal("1.5").with_significant_digits(20), decimal("1.5"));
        assert_eq!(decimal("1.23456").with_significant_digits(0), decimal("1.23456"));
    }

    #[test]
    fn test_raw_amount_scaling() {
        let amount = DecimalPrice::from_raw_amount(1_234_567_890, 9);
        assert_eq!(amount.to_plain_string(), "1.23456789");
        assert_eq!(DecimalPrice::from_raw_amount(42, 0).to_plain_string(), "42");
        assert!(DecimalPrice::from_raw_amount(0, 6).is_zero());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&decimal("0.25")).unwrap();
        assert_eq!(json, "\"0.25\"");
    }
}
