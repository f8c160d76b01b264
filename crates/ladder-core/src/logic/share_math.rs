//! Conversions between shares and underlying amounts
//!
//! Deposits round in the vault's favour (amounts up), withdrawals round against
//! the caller (amounts down), so no sequence of mints and burns can extract more
//! than was put in.

use serde::{Deserialize, Serialize};

use crate::constants::MINIMUM_LIQUIDITY;
use crate::error::{VaultError, VaultResult};
use crate::math::{
    base_from_quote, mul_div, mul_div_down, quote_from_base, safe_add_u128, safe_mul_u128,
    Rounding, Tick,
};

/// Shares and the underlying amounts that back them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintAmounts {
    pub shares: u128,
    pub base: u128,
    pub quote: u128,
}

/// Size the first deposit from the caller's maxima at the oracle tick.
///
/// Uses all of `max_quote` unless that would need more than `max_base`, in which
/// case base is capped and quote recomputed. Shares are the quote-equivalent
/// value scaled to share decimals, less the permanently locked dead shares.
pub fn initial_mint_amounts(
    max_base: u128,
    max_quote: u128,
    tick: Tick,
    quote_scale: u128,
) -> VaultResult<MintAmounts> {
    let base_for_max_quote = base_from_quote(max_quote, tick, Rounding::Down)?;
    let (base, quote) = if base_for_max_quote > max_base {
        (max_base, quote_from_base(max_base, tick, Rounding::Up)?)
    } else {
        (base_for_max_quote, max_quote)
    };

    let value = safe_add_u128(quote_from_base(base, tick, Rounding::Down)?, quote)?;
    let shares = safe_mul_u128(value, quote_scale)
        .map_err(|_| VaultError::QuoteAmountOverflow)?
        .saturating_sub(MINIMUM_LIQUIDITY);

    Ok(MintAmounts {
        shares,
        base,
        quote,
    })
}

/// Amounts owed for minting `shares` against an existing supply, rounded up
pub fn mint_amounts_for_shares(
    shares: u128,
    base_balance: u128,
    quote_balance: u128,
    total_shares: u128,
) -> VaultResult<(u128, u128)> {
    if total_shares == 0 {
        return Err(VaultError::DivisionByZero);
    }
    Ok((
        mul_div(shares, base_balance, total_shares, Rounding::Up)?,
        mul_div(shares, quote_balance, total_shares, Rounding::Up)?,
    ))
}

/// Amounts released by burning `shares`, rounded down
pub fn burn_amounts(
    shares: u128,
    base_balance: u128,
    quote_balance: u128,
    total_shares: u128,
) -> VaultResult<(u128, u128)> {
    if total_shares == 0 {
        return Err(VaultError::DivisionByZero);
    }
    Ok((
        mul_div(shares, base_balance, total_shares, Rounding::Down)?,
        mul_div(shares, quote_balance, total_shares, Rounding::Down)?,
    ))
}

/// Largest share count whose rounded-up cost fits within both maxima.
///
/// A side with no balance constrains nothing; with both sides empty the pool
/// backs no value and nothing may be minted.
pub fn max_mintable_shares(
    max_base: u128,
    max_quote: u128,
    base_balance: u128,
    quote_balance: u128,
    total_shares: u128,
) -> VaultResult<u128> {
    if total_shares == 0 || (base_balance == 0 && quote_balance == 0) {
        return Ok(0);
    }

    // floor(max * T / balance) keeps ceil(shares * balance / T) <= max
    let limit = |max: u128, balance: u128| -> VaultResult<u128> {
        if balance == 0 {
            Ok(u128::MAX)
        } else {
            mul_div_down(max, total_shares, balance).or_else(|err| match err {
                VaultError::MathOverflow => Ok(u128::MAX),
                other => Err(other),
            })
        }
    };
    Ok(limit(max_base, base_balance)?.min(limit(max_quote, quote_balance)?))
}

/// Shares and costs a deposit bounded by the maxima would receive
pub fn preview_mint(
    max_base: u128,
    max_quote: u128,
    base_balance: u128,
    quote_balance: u128,
    total_shares: u128,
    tick: Tick,
    quote_scale: u128,
) -> VaultResult<MintAmounts> {
    if total_shares == 0 {
        return initial_mint_amounts(max_base, max_quote, tick, quote_scale);
    }
    let shares = max_mintable_shares(
        max_base,
        max_quote,
        base_balance,
        quote_balance,
        total_shares,
    )?;
    let (base, quote) =
        mint_amounts_for_shares(shares, base_balance, quote_balance, total_shares)?;
    Ok(MintAmounts {
        shares,
        base,
        quote,
    })
}
