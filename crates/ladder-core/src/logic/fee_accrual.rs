//! Management and performance fee accrual
//!
//! Fees are paid by minting new shares to the recipient, which dilutes every other
//! holder. The share count is chosen so that, after the mint, the recipient owns
//! `fee_value / value_in_quote` of the pool as it stood before the fee.
//!
//! Performance fees are charged only on value above the running high-water mark;
//! management fees accrue linearly on the whole pool for the elapsed time.

use tracing::{debug, warn};

use crate::constants::{MANAGEMENT_FEE_PRECISION, PERFORMANCE_FEE_PRECISION};
use crate::math::mul_div_down;
use crate::state::{Checkpoint, FeeData};

/// Result of one accrual step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeComputation {
    /// Shares to mint to the fee recipient
    pub fee_shares: u128,
    /// Fee expressed in quote units
    pub fee_value: u128,
    /// Value growth above the high-water mark
    pub growth: u128,
    /// Seconds since the last checkpoint
    pub elapsed: u64,
}

/// Compute the fee shares owed since `checkpoint`. Never fails: degenerate inputs
/// (empty supply, zero value, overflowing products) yield zero shares.
pub fn compute_fee_shares(
    value_in_quote: u128,
    total_shares: u128,
    checkpoint: &Checkpoint,
    fee_data: &FeeData,
    now: u64,
) -> FeeComputation {
    let growth = value_in_quote.saturating_sub(checkpoint.performance_baseline());
    let elapsed = now.saturating_sub(checkpoint.last_timestamp);

    let mut result = FeeComputation {
        growth,
        elapsed,
        ..Default::default()
    };

    let charges_performance = growth > 0 && fee_data.performance_fee > 0;
    let charges_management =
        value_in_quote > 0 && fee_data.management_fee > 0 && elapsed > 0;
    if !charges_performance && !charges_management {
        return result;
    }

    // growth <= value_in_quote, so the performance part always fits
    let performance_value = mul_div_down(
        growth,
        fee_data.performance_fee as u128,
        PERFORMANCE_FEE_PRECISION,
    )
    .unwrap_or(0);
    let management_value = mul_div_down(
        value_in_quote,
        (fee_data.management_fee as u128).saturating_mul(elapsed as u128),
        MANAGEMENT_FEE_PRECISION,
    )
    .unwrap_or(value_in_quote);
    let fee_value = performance_value.saturating_add(management_value);
    result.fee_value = fee_value;

    if fee_value == 0 || total_shares == 0 {
        return result;
    }
    if fee_value >= value_in_quote {
        warn!(
            fee_value,
            value_in_quote, "fee value covers the whole pool, skipping fee mint"
        );
        return result;
    }

    match mul_div_down(fee_value, total_shares, value_in_quote - fee_value) {
        Ok(shares) => result.fee_shares = shares,
        Err(err) => warn!(%err, fee_value, total_shares, "fee share computation overflowed"),
    }

    debug!(
        growth,
        elapsed,
        performance_value,
        management_value,
        fee_shares = result.fee_shares,
        "computed fee accrual"
    );
    result
}
