//! The vault's singleton state: share supply, checkpoint, fees, cap and ladder

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_QUOTE_DECIMALS_OFFSET;
use crate::error::{VaultError, VaultResult};
use crate::math::pow10;
use crate::state::{Checkpoint, FeeData, Position, ShareLedger};
use crate::types::Address;

/// State owned and mutated exclusively by vault operations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultState {
    /// Custody identity of the vault itself (idle balances, dead shares)
    pub vault: Address,
    pub base: Address,
    pub quote: Address,
    /// Role allowed to run administrative operations
    pub manager: Address,
    /// 10^(share decimals - quote decimals)
    pub quote_scale: u128,
    pub shares: ShareLedger,
    pub checkpoint: Checkpoint,
    pub fee_data: FeeData,
    /// Deposit cap on pooled value in quote units
    pub max_total_in_quote: u128,
    pub position: Position,
    pub allowed_swap_contracts: BTreeSet<Address>,
}

impl VaultState {
    /// Fresh state: zero shares, funds held in the vault, no cap
    pub fn new(
        vault: Address,
        base: Address,
        quote: Address,
        manager: Address,
        quote_decimals_offset: u8,
    ) -> VaultResult<Self> {
        vault.require_non_zero()?;
        base.require_non_zero()?;
        quote.require_non_zero()?;
        manager.require_non_zero()?;
        if base == quote {
            return Err(VaultError::config("base and quote must differ"));
        }
        if quote_decimals_offset > MAX_QUOTE_DECIMALS_OFFSET {
            return Err(VaultError::config(format!(
                "quote decimals offset {} above {}",
                quote_decimals_offset, MAX_QUOTE_DECIMALS_OFFSET
            )));
        }

        Ok(Self {
            vault,
            base,
            quote,
            manager,
            quote_scale: pow10(quote_decimals_offset)?,
            shares: ShareLedger::default(),
            checkpoint: Checkpoint::default(),
            fee_data: FeeData::default(),
            max_total_in_quote: u128::MAX,
            position: Position::default(),
            allowed_swap_contracts: BTreeSet::new(),
        })
    }

    pub fn total_shares(&self) -> u128 {
        self.shares.total_supply()
    }

    pub fn require_manager(&self, caller: &Address) -> VaultResult<()> {
        if *caller != self.manager {
            return Err(VaultError::Unauthorized(caller.to_string()));
        }
        Ok(())
    }

    pub fn is_pool_token(&self, asset: &Address) -> bool {
        *asset == self.base || *asset == self.quote
    }
}
