//! # Tick Math
//!
//! Price ticks on the 1.0001 logarithmic scale: `price = 1.0001^tick` quote units
//! per base unit. The inverse ratio is built from precomputed powers in Q128 and
//! carried as a normalised mantissa and binary exponent, so prices near either
//! end of the range keep full precision. Amounts go through the 256-bit mul-div
//! with the caller choosing the rounding.

use ethnum::U256;

use crate::constants::{MAX_TICK, MIN_TICK};
use crate::error::{VaultError, VaultResult};
use crate::math::big_int::{mul_div_u256, u256_to_u128, Rounding};

/// Signed logarithmic price
pub type Tick = i32;

/// floor(2^128 / 1.0001^(2^i)) for i in 0..20
const INV_PRICE_FACTORS_X128: [u128; 20] = [
    0xfff97272373d413259a46990580e2139,
    0xfff2e50f5f656932ef12357cf3c7fdcb,
    0xffe5caca7e10e4e61c3624eaa0941ccf,
    0xffcb9843d60f6159c9db58835c926643,
    0xff973b41fa98c081472e6896dfb254bf,
    0xff2ea16466c96a3843ec78b326b52860,
    0xfe5dee046a99a2a811c461f1969c3052,
    0xfcbe86c7900a88aedcffc83b479aa3a3,
    0xf987a7253ac413176f2b074cf7815e53,
    0xf3392b0822b70005940c7a398e4b70f2,
    0xe7159475a2c29b7443b29c7fa6e889d8,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e4,
    0x70d869a156d2a1b890bb3df62baf32f6,
    0x31be135f97d08fd981231505542fcfa5,
    0x9aa508b5b7a84e1c677de54f3e99bc8,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe97,
    0x48a170391f7dc42444e8fa2,
    0x149b34ee7ac262,
];

/// Check if a tick is within the supported range
pub fn is_tick_valid(tick: Tick) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// `1.0001^-|tick|` as `mantissa * 2^-exponent` with a 128-bit normalised mantissa
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InversePrice {
    /// In `[2^127, 2^128)`
    pub mantissa: U256,
    pub exponent: u32,
}

/// Inverse price of `tick`, keeping 128 significant bits across the whole range
pub fn inverse_price(tick: Tick) -> VaultResult<InversePrice> {
    if !is_tick_valid(tick) {
        return Err(VaultError::InvalidTick(tick));
    }

    let abs_tick = tick.unsigned_abs();
    let mut mantissa = U256::ONE << 127u32;
    let mut exponent = 127u32;
    for (bit, factor) in INV_PRICE_FACTORS_X128.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            // mantissa < 2^128 and factor < 2^128, the product fits
            let product = mantissa * U256::new(*factor);
            let shift = (256 - product.leading_zeros()).saturating_sub(128);
            mantissa = product >> shift;
            exponent = exponent + 128 - shift;
        }
    }

    Ok(InversePrice { mantissa, exponent })
}

/// `value / 2^shift` in the requested direction
fn shr_rounding(value: U256, shift: u32, rounding: Rounding) -> U256 {
    let quotient = if shift >= 256 { U256::ZERO } else { value >> shift };
    let exact = shift < 256 && (quotient << shift) == value;
    if rounding == Rounding::Up && !exact {
        quotient + U256::ONE
    } else {
        quotient
    }
}

/// Quote amount worth `base_amount` at `tick`
pub fn quote_from_base(base_amount: u128, tick: Tick, rounding: Rounding) -> VaultResult<u128> {
    let inverse = inverse_price(tick)?;
    if base_amount == 0 {
        return Ok(0);
    }

    let amount = U256::new(base_amount);
    let result = if tick >= 0 {
        // Quotient is at least 2^(exponent - 128), past u128 once exponent hits 256
        if inverse.exponent >= 256 {
            return Err(VaultError::MathOverflow);
        }
        mul_div_u256(amount, U256::ONE << inverse.exponent, inverse.mantissa, rounding)?
    } else {
        shr_rounding(amount * inverse.mantissa, inverse.exponent, rounding)
    };
    u256_to_u128(result)
}

/// Base amount worth `quote_amount` at `tick`
pub fn base_from_quote(quote_amount: u128, tick: Tick, rounding: Rounding) -> VaultResult<u128> {
    let mirrored = tick.checked_neg().ok_or(VaultError::InvalidTick(tick))?;
    quote_from_base(quote_amount, mirrored, rounding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(got: u128, expected: f64) {
        let err = (got as f64 - expected).abs() / expected;
        assert!(err < 1e-9, "got {} expected {} (rel err {})", got, expected, err);
    }

    #[test]
    fn test_tick_zero_is_identity() {
        let one = inverse_price(0).unwrap();
        assert_eq!(one.mantissa, U256::ONE << 127u32);
        assert_eq!(one.exponent, 127);
        assert_eq!(quote_from_base(12_345, 0, Rounding::Down).unwrap(), 12_345);
        assert_eq!(base_from_quote(12_345, 0, Rounding::Up).unwrap(), 12_345);
    }

    #[test]
    fn test_known_ticks() {
        let one = 1_000_000_000_000_000_000u128;
        let q = quote_from_base(one, 1, Rounding::Down).unwrap();
        assert!(q.abs_diff(1_000_100_000_000_000_000) <= 1);

        // 1.0001^69082 ~= 1000.0993
        assert_close(
            quote_from_base(1_000_000, 69_082, Rounding::Down).unwrap(),
            1.0001f64.powi(69_082) * 1_000_000.0,
        );
        assert_close(
            quote_from_base(one, -69_082, Rounding::Down).unwrap(),
            1.0001f64.powi(-69_082) * one as f64,
        );
        assert_close(
            base_from_quote(3_000_000_000, 80_000, Rounding::Down).unwrap(),
            1.0001f64.powi(-80_000) * 3_000_000_000.0,
        );
    }

    #[test]
    fn test_rounding_direction() {
        for tick in [-50_000, -7, 3, 12_345, 200_000] {
            let down = quote_from_base(777_777_777, tick, Rounding::Down).unwrap();
            let up = quote_from_base(777_777_777, tick, Rounding::Up).unwrap();
            assert!(up >= down && up - down <= 1, "tick {}", tick);
        }
    }

    #[test]
    fn test_round_trip_never_gains() {
        for tick in [-120_000, -1, 1, 45_000] {
            let base = 5_000_000_000u128;
            let quote = quote_from_base(base, tick, Rounding::Down).unwrap();
            let back = base_from_quote(quote, tick, Rounding::Down).unwrap();
            assert!(back <= base, "tick {}", tick);
        }
    }

    #[test]
    fn test_extreme_ticks_keep_precision() {
        let price = |tick: f64| (tick * 1.0001f64.ln()).exp();
        // 1.0001^887000 ~= 3.3e38, just inside u128
        assert_close(quote_from_base(1, 887_000, Rounding::Down).unwrap(), price(887_000.0));
        assert_close(
            base_from_quote(1_000, -600_000, Rounding::Down).unwrap(),
            price(600_000.0) * 1_000.0,
        );
        // u128::MAX * 1.0001^-887000 ~= 1.03
        assert_eq!(quote_from_base(u128::MAX, -887_000, Rounding::Down).unwrap(), 1);
        assert_eq!(quote_from_base(u128::MAX, -887_000, Rounding::Up).unwrap(), 2);
        assert_eq!(quote_from_base(1, -887_000, Rounding::Down).unwrap(), 0);
        assert_eq!(quote_from_base(1, -887_000, Rounding::Up).unwrap(), 1);
    }

    #[test]
    fn test_bounds() {
        assert!(is_tick_valid(MIN_TICK));
        assert!(is_tick_valid(MAX_TICK));
        assert!(!is_tick_valid(MAX_TICK + 1));
        assert_eq!(
            quote_from_base(1, MIN_TICK - 1, Rounding::Down),
            Err(VaultError::InvalidTick(MIN_TICK - 1))
        );
        let inverse = inverse_price(MAX_TICK).unwrap();
        assert!(inverse.mantissa >= U256::ONE << 127u32);
        assert!(inverse.mantissa < U256::ONE << 128u32);
        assert_eq!(
            quote_from_base(u128::MAX, 1_000, Rounding::Down),
            Err(VaultError::MathOverflow)
        );
    }
}
