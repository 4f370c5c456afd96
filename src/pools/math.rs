/// Fixed-point price and tick math for Raydium CLMM pools
///
/// Prices sit on the geometric ladder `price = 1.0001^tick`. Pools store `sqrt(price)`
/// as a Q64.64 integer (`sqrt_price_x64`). All conversions here use exact big-integer
/// or decimal arithmetic; binary floating point never enters the computation.
use crate::errors::{ClmmError, ClmmResult};
use crate::pools::types::DecimalPrice;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive};
use once_cell::sync::Lazy;
use std::cmp::Ordering;

/// Lowest tick allowed by the CLMM program
pub const MIN_TICK: i32 = -443636;
/// Highest tick allowed by the CLMM program
pub const MAX_TICK: i32 = -MIN_TICK;

/// Lowest sqrt price a CLMM pool can hold (the program's `MIN_SQRT_PRICE_X64`)
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;
/// Highest sqrt price a CLMM pool can hold (the program's `MAX_SQRT_PRICE_X64`).
/// The program's own ladder rounds up at `MAX_TICK`, so this sits slightly above
/// the exact `max_sqrt_price_x64()`.
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_521_066_979_257_578_248_091;

/// Fraction bits of the internal ladder representation
const LADDER_FRACTION_BITS: u64 = 256;
/// Fraction bits of the on-chain sqrt price
const X64_FRACTION_BITS: u64 = 64;
/// 2^19 > MAX_TICK, so 19 rungs cover every legal |tick|
const LADDER_RUNGS: usize = 19;

/// `sqrt(1.0001)^(2^i)` scaled by `2^LADDER_FRACTION_BITS`
static SQRT_RATIO_LADDER: Lazy<Vec<BigUint>> = Lazy::new(|| {
    let scaled_ratio = (BigUint::from(10001u32) << (2 * LADDER_FRACTION_BITS)) / BigUint::from(10000u32);
    let mut rung = scaled_ratio.sqrt();
    let mut ladder = Vec::with_capacity(LADDER_RUNGS);
    for _ in 0..LADDER_RUNGS {
        let next = (&rung * &rung) >> LADDER_FRACTION_BITS;
        ladder.push(rung);
        rung = next;
    }
    ladder
});

static LADDER_MIN_SQRT_PRICE_X64: Lazy<u128> =
    Lazy::new(|| sqrt_price_x64_at(MIN_TICK).to_u128().unwrap_or(0));

static LADDER_MAX_SQRT_PRICE_X64: Lazy<u128> =
    Lazy::new(|| sqrt_price_x64_at(MAX_TICK).to_u128().unwrap_or(u128::MAX));

/// Exact sqrt price at `MIN_TICK`
pub fn min_sqrt_price_x64() -> u128 {
    *LADDER_MIN_SQRT_PRICE_X64
}

/// Exact sqrt price at `MAX_TICK`
pub fn max_sqrt_price_x64() -> u128 {
    *LADDER_MAX_SQRT_PRICE_X64
}

fn check_sqrt_price(sqrt_price_x64: u128) -> ClmmResult<()> {
    if (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
        Ok(())
    } else {
        Err(ClmmError::invalid_input(format!(
            "sqrt price {} outside [{}, {}]",
            sqrt_price_x64, MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64
        )))
    }
}

fn check_tick(tick: i32) -> ClmmResult<()> {
    if (MIN_TICK..=MAX_TICK).contains(&tick) {
        Ok(())
    } else {
        Err(ClmmError::TickOutOfRange {
            tick: tick as i64,
            min: MIN_TICK,
            max: MAX_TICK,
        })
    }
}

/// Shift right by `bits`, rounding the discarded part half to even
fn shift_right_half_even(value: &BigUint, bits: u64) -> BigUint {
    let quotient = value >> bits;
    let remainder = value - (&quotient << bits);
    let half = BigUint::one() << (bits - 1);

    match remainder.cmp(&half) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1u32,
        Ordering::Equal => {
            if quotient.bit(0) {
                quotient + 1u32
            } else {
                quotient
            }
        }
    }
}

/// Ladder evaluation without range checks. Callers guarantee `|tick| < 2^19`.
fn sqrt_price_x64_at(tick: i32) -> BigUint {
    let abs_tick = tick.unsigned_abs();
    let mut ratio = BigUint::one() << LADDER_FRACTION_BITS;

    for (bit, rung) in SQRT_RATIO_LADDER.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * rung) >> LADDER_FRACTION_BITS;
        }
    }

    if tick < 0 {
        ratio = (BigUint::one() << (2 * LADDER_FRACTION_BITS)) / ratio;
    }

    shift_right_half_even(&ratio, LADDER_FRACTION_BITS - X64_FRACTION_BITS)
}

/// `1.0001^(tick / 2) * 2^64`, rounded half to even
///
/// Strictly increasing in `tick`. Fails with `TickOutOfRange` outside
/// `[MIN_TICK, MAX_TICK]`.
pub fn get_sqrt_price_x64_from_tick(tick: i32) -> ClmmResult<u128> {
    check_tick(tick)?;
    sqrt_price_x64_at(tick).to_u128().ok_or_else(|| {
        ClmmError::invalid_input(format!("sqrt price for tick {} exceeds 128 bits", tick))
    })
}

/// Greatest tick whose sqrt price is `<= sqrt_price_x64`
///
/// Accepts `[MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64]`; anything above the
/// exact ladder value at `MAX_TICK` maps to `MAX_TICK`.
pub fn get_tick_from_sqrt_price_x64(sqrt_price_x64: u128) -> ClmmResult<i32> {
    check_sqrt_price(sqrt_price_x64)?;

    let target = BigUint::from(sqrt_price_x64);
    let (mut low, mut high) = (MIN_TICK, MAX_TICK);
    // sqrt_price_x64_at(low) <= target holds throughout
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if sqrt_price_x64_at(mid) <= target {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

/// `(sqrt_price_x64 / 2^64)^2 * 10^(decimals_a - decimals_b)`, exact
///
/// The square over 2^128 has a finite decimal expansion:
/// `s^2 / 2^128 = s^2 * 5^128 / 10^128`, so no rounding happens here.
/// Zero (uninitialized pool) prices at `0`; otherwise the value must lie in
/// `[MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64]`.
pub fn sqrt_price_x64_to_price(
    sqrt_price_x64: u128,
    decimals_a: u8,
    decimals_b: u8,
) -> ClmmResult<DecimalPrice> {
    if sqrt_price_x64 != 0 {
        check_sqrt_price(sqrt_price_x64)?;
    }

    let fraction_digits = 2 * X64_FRACTION_BITS as u32;
    let mantissa = BigInt::from(sqrt_price_x64).pow(2) * BigInt::from(5u32).pow(fraction_digits);
    let scale = fraction_digits as i64 - (decimals_a as i64 - decimals_b as i64);

    Ok(DecimalPrice::new(BigDecimal::new(mantissa, scale)))
}

/// Decimal-adjusted price at a tick
pub fn tick_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> ClmmResult<DecimalPrice> {
    let sqrt_price_x64 = get_sqrt_price_x64_from_tick(tick)?;
    sqrt_price_x64_to_price(sqrt_price_x64, decimals_a, decimals_b)
}

/// Parse a base-10 sqrt price as found in JSON reports and CLI arguments
pub fn parse_sqrt_price_x64(text: &str) -> ClmmResult<u128> {
    text.trim().parse::<u128>().map_err(|e| {
        ClmmError::invalid_input(format!("'{}' is not a valid sqrt price: {}", text, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    const Q64: u128 = 1u128 << 64;

    #[test]
    fn test_tick_zero_is_one() {
        assert_eq!(get_sqrt_price_x64_from_tick(0).unwrap(), Q64);
    }

    #[test]
    fn test_known_ladder_values() {
        assert_eq!(get_sqrt_price_x64_from_tick(1).unwrap(), 18447666387855959851);
        assert_eq!(get_sqrt_price_x64_from_tick(-1).unwrap(), 18445821805675392312);
        assert_eq!(get_sqrt_price_x64_from_tick(10000).unwrap(), 30412779051191548722);
        assert_eq!(get_sqrt_price_x64_from_tick(-12345).unwrap(), 9950957148631419638);
    }

    #[test]
    fn test_ladder_bounds() {
        assert_eq!(min_sqrt_price_x64(), 4295048016);
        assert_eq!(max_sqrt_price_x64(), 79226673515401279992447579061);
        assert_eq!(get_sqrt_price_x64_from_tick(MIN_TICK).unwrap(), min_sqrt_price_x64());
        assert_eq!(get_sqrt_price_x64_from_tick(MAX_TICK).unwrap(), max_sqrt_price_x64());
        assert_eq!(min_sqrt_price_x64(), MIN_SQRT_PRICE_X64);
        assert!(max_sqrt_price_x64() < MAX_SQRT_PRICE_X64);
    }

    #[test]
    fn test_tick_out_of_range() {
        assert_eq!(
            get_sqrt_price_x64_from_tick(MAX_TICK + 1),
            Err(ClmmError::TickOutOfRange {
                tick: (MAX_TICK + 1) as i64,
                min: MIN_TICK,
                max: MAX_TICK
            })
        );
        assert!(matches!(
            get_sqrt_price_x64_from_tick(i32::MIN),
            Err(ClmmError::TickOutOfRange { .. })
        ));
        assert!(matches!(tick_to_price(MIN_TICK - 1, 6, 6), Err(ClmmError::TickOutOfRange { .. })));
    }

    #[test]
    fn test_tick_from_sqrt_price_edges() {
        assert_eq!(get_tick_from_sqrt_price_x64(Q64).unwrap(), 0);
        assert_eq!(get_tick_from_sqrt_price_x64(Q64 - 1).unwrap(), -1);
        assert_eq!(get_tick_from_sqrt_price_x64(Q64 + 1).unwrap(), 0);
        assert_eq!(get_tick_from_sqrt_price_x64(min_sqrt_price_x64()).unwrap(), MIN_TICK);
        assert_eq!(get_tick_from_sqrt_price_x64(max_sqrt_price_x64()).unwrap(), MAX_TICK);
        assert_eq!(get_tick_from_sqrt_price_x64(max_sqrt_price_x64() - 1).unwrap(), MAX_TICK - 1);
        // Between the exact ladder top and the program's bound
        assert_eq!(get_tick_from_sqrt_price_x64(max_sqrt_price_x64() + 1).unwrap(), MAX_TICK);
        assert_eq!(get_tick_from_sqrt_price_x64(MAX_SQRT_PRICE_X64).unwrap(), MAX_TICK);
    }

    #[test]
    fn test_tick_from_sqrt_price_rejects_out_of_domain() {
        for sqrt_price in [0, MIN_SQRT_PRICE_X64 - 1, MAX_SQRT_PRICE_X64 + 1, u128::MAX] {
            assert!(matches!(
                get_tick_from_sqrt_price_x64(sqrt_price),
                Err(ClmmError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_round_trip_sampled_range() {
        let mut tick = MIN_TICK;
        while tick <= MAX_TICK {
            let sqrt_price = get_sqrt_price_x64_from_tick(tick).unwrap();
            assert_eq!(get_tick_from_sqrt_price_x64(sqrt_price).unwrap(), tick);
            tick += 9973;
        }
    }

    #[test]
    fn test_price_unit_sqrt_with_decimal_gap() {
        let price = sqrt_price_x64_to_price(Q64, 9, 6).unwrap();
        assert_eq!(price.to_plain_string(), "1000");
        assert_eq!(price, DecimalPrice::from_str("1000").unwrap());

        let price = sqrt_price_x64_to_price(Q64, 6, 9).unwrap();
        assert_eq!(price.to_plain_string(), "0.001");
    }

    #[test]
    fn test_price_at_tick_zero_equal_decimals() {
        let price = tick_to_price(0, 6, 6).unwrap();
        assert_eq!(price.to_plain_string(), "1");
    }

    #[test]
    fn test_price_is_exact_then_rounded() {
        let price = sqrt_price_x64_to_price(30412779051191548722, 6, 6).unwrap();
        assert_eq!(
            price.with_significant_digits(20).to_plain_string(),
            "2.718145926825224864"
        );

        // SOL (9 decimals) priced in USDC (6 decimals) at ~150
        let price = sqrt_price_x64_to_price(7144393258922745604, 9, 6).unwrap();
        assert_eq!(
            price.with_significant_digits(20).to_plain_string(),
            "149.99999999999999997"
        );
    }

    #[test]
    fn test_price_zero_and_out_of_width() {
        assert!(sqrt_price_x64_to_price(0, 9, 6).unwrap().is_zero());
        assert!(matches!(
            sqrt_price_x64_to_price(MAX_SQRT_PRICE_X64 + 1, 6, 6),
            Err(ClmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            sqrt_price_x64_to_price(MIN_SQRT_PRICE_X64 - 1, 6, 6),
            Err(ClmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            sqrt_price_x64_to_price(u128::MAX, 0, 0),
            Err(ClmmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_prices_above_exact_ladder_top_are_legal() {
        for sqrt_price in [max_sqrt_price_x64() + 1, MAX_SQRT_PRICE_X64 - 1, MAX_SQRT_PRICE_X64] {
            let price = sqrt_price_x64_to_price(sqrt_price, 6, 6).unwrap();
            assert!(price.as_big_decimal() > &BigDecimal::from(18_000_000_000_000_000_000u64));
        }
        assert!(sqrt_price_x64_to_price(MIN_SQRT_PRICE_X64, 9, 6).is_ok());
    }

    #[test]
    fn test_swapped_decimals_and_reciprocal_sqrt_gives_reciprocal_price() {
        let sqrt_price = 7144393258922745604u128;
        let reciprocal = u128::MAX / sqrt_price;

        let forward = sqrt_price_x64_to_price(sqrt_price, 9, 6).unwrap();
        let backward = sqrt_price_x64_to_price(reciprocal, 6, 9).unwrap();
        assert_eq!(
            backward.with_significant_digits(12).to_plain_string(),
            "0.00666666666667"
        );

        let product = forward.as_big_decimal() * backward.as_big_decimal();
        let tolerance = BigDecimal::from_str("0.000000000001").unwrap();
        assert!((product - BigDecimal::from(1)).abs() < tolerance);
    }

    #[test]
    fn test_parse_sqrt_price() {
        assert_eq!(parse_sqrt_price_x64("18446744073709551616").unwrap(), Q64);
        assert_eq!(parse_sqrt_price_x64(" 42 ").unwrap(), 42);
        assert!(matches!(parse_sqrt_price_x64("-1"), Err(ClmmError::InvalidInput { .. })));
        assert!(matches!(parse_sqrt_price_x64("1.5"), Err(ClmmError::InvalidInput { .. })));
        // 2^128 does not fit
        assert!(matches!(
            parse_sqrt_price_x64("340282366920938463463374607431768211456"),
            Err(ClmmError::InvalidInput { .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_trip(tick in MIN_TICK..=MAX_TICK) {
            let sqrt_price = get_sqrt_price_x64_from_tick(tick).unwrap();
            prop_assert_eq!(get_tick_from_sqrt_price_x64(sqrt_price).unwrap(), tick);
        }

        #[test]
        fn prop_strictly_monotonic(tick in MIN_TICK..MAX_TICK, step in 1i32..2000) {
            let upper = (tick + step).min(MAX_TICK);
            let lower_price = get_sqrt_price_x64_from_tick(tick).unwrap();
            let upper_price = get_sqrt_price_x64_from_tick(upper).unwrap();
            prop_assert!(lower_price < upper_price);
        }

        #[test]
        fn prop_price_between_neighbouring_ticks(sqrt_price in MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64) {
            let tick = get_tick_from_sqrt_price_x64(sqrt_price).unwrap();
            prop_assert!(get_sqrt_price_x64_from_tick(tick).unwrap() <= sqrt_price);
            if tick < MAX_TICK {
                prop_assert!(get_sqrt_price_x64_from_tick(tick + 1).unwrap() > sqrt_price);
            }
        }

        #[test]
        fn prop_swapped_decimals_give_reciprocal_price(
            sqrt_price in (1u128 << 52)..(1u128 << 76),
            decimals_a in 0u8..=18,
            decimals_b in 0u8..=18,
        ) {
            let reciprocal = u128::MAX / sqrt_price;
            let forward = sqrt_price_x64_to_price(sqrt_price, decimals_a, decimals_b).unwrap();
            let backward = sqrt_price_x64_to_price(reciprocal, decimals_b, decimals_a).unwrap();

            let product = forward.as_big_decimal() * backward.as_big_decimal();
            let tolerance = BigDecimal::from_str("0.000000000001").unwrap();
            prop_assert!((product - BigDecimal::from(1)).abs() < tolerance);
        }
    }
}
