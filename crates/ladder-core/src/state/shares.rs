//! Share balances of the vault's fungible ownership token

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};
use crate::math::{safe_add_u128, safe_sub_u128};
use crate::types::Address;

/// Share ledger; `total_supply` always equals the sum of balances
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: BTreeMap<Address, u128>,
    total_supply: u128,
}

impl ShareLedger {
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn mint(&mut self, to: Address, amount: u128) -> VaultResult<()> {
        to.require_non_zero()?;
        let total = safe_add_u128(self.total_supply, amount)?;
        let balance = self.balances.entry(to).or_insert(0);
        *balance = safe_add_u128(*balance, amount)?;
        self.total_supply = total;
        Ok(())
    }

    pub fn burn(&mut self, from: &Address, amount: u128) -> VaultResult<()> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(VaultError::InsufficientShares {
                balance,
                requested: amount,
            });
        }

        let remaining = balance - amount;
        if remaining == 0 {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        self.total_supply = safe_sub_u128(self.total_supply, amount)?;
        Ok(())
    }

    /// Move shares between holders
    pub fn transfer(&mut self, from: &Address, to: Address, amount: u128) -> VaultResult<()> {
        self.burn(from, amount)?;
        self.mint(to, amount)
    }
}
