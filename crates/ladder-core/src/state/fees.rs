//! Fee configuration and the value checkpoint used for accrual

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MANAGEMENT_FEE, MAX_PERFORMANCE_FEE};
use crate::error::{VaultError, VaultResult};
use crate::types::Address;

/// Manager-set fee rates and their recipient
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeData {
    /// Share of value growth, over PERFORMANCE_FEE_PRECISION
    pub performance_fee: u32,
    /// Yearly share of pooled value, over MANAGEMENT_FEE_PRECISION per second
    pub management_fee: u32,
    pub fee_recipient: Address,
}

impl FeeData {
    pub fn validate(&self) -> VaultResult<()> {
        if self.performance_fee > MAX_PERFORMANCE_FEE {
            return Err(VaultError::PerformanceFeeTooHigh(self.performance_fee));
        }
        if self.management_fee > MAX_MANAGEMENT_FEE {
            return Err(VaultError::ManagementFeeTooHigh(self.management_fee));
        }
        self.fee_recipient.require_non_zero()?;
        Ok(())
    }
}

/// Value checkpoint advanced after every supply-changing operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Pooled value in quote units at the last commit
    pub last_value_in_quote: u128,
    /// Unix seconds of the last commit
    pub last_timestamp: u64,
    /// Running maximum of pooled value, adjusted for deposits and withdrawals
    pub high_water_mark: u128,
}

impl Checkpoint {
    /// Record a fresh valuation; the high-water mark only ratchets up
    pub fn commit(&mut self, value_in_quote: u128, now: u64) {
        self.last_value_in_quote = value_in_quote;
        self.last_timestamp = now;
        self.high_water_mark = self.high_water_mark.max(value_in_quote);
    }

    /// Value level performance fees are measured against
    pub fn performance_baseline(&self) -> u128 {
        self.last_value_in_quote.max(self.high_water_mark)
    }
}
