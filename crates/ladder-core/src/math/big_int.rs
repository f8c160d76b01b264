//! Big integer operations for high-precision math
//!
//! 256-bit intermediates for mul-div with an explicit rounding direction. Every
//! rounding site in the vault names its direction so the favoured party is visible.

use ethnum::U256;

use crate::error::{VaultError, VaultResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Convert a U256 back to u128, failing if the high word is set
pub fn u256_to_u128(value: U256) -> VaultResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(VaultError::MathOverflow);
    }
    Ok(lo)
}

/// result = (a * b) / denominator on 256-bit operands
pub fn mul_div_u256(a: U256, b: U256, denominator: U256, rounding: Rounding) -> VaultResult<U256> {
    if denominator == U256::ZERO {
        return Err(VaultError::DivisionByZero);
    }

    let product = a.checked_mul(b).ok_or(VaultError::MathOverflow)?;
    let quotient = product / denominator;

    if rounding == Rounding::Up && product % denominator != U256::ZERO {
        return quotient
            .checked_add(U256::ONE)
            .ok_or(VaultError::MathOverflow);
    }

    Ok(quotient)
}

/// result = (a * b) / denominator; the product never overflows 256 bits
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> VaultResult<u128> {
    let result = mul_div_u256(
        U256::new(a),
        U256::new(b),
        U256::new(denominator),
        rounding,
    )?;
    u256_to_u128(result)
}

/// Floor mul-div
pub fn mul_div_down(a: u128, b: u128, denominator: u128) -> VaultResult<u128> {
    mul_div(a, b, denominator, Rounding::Down)
}
