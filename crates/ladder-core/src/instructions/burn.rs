//! Burn instruction
//!
//! Redeem shares for a floor-rounded slice of idle plus reserved assets. Any
//! shortfall in idle custody is pulled from the market-making reserve first.

use tracing::info;

use crate::error::{VaultError, VaultResult};
use crate::events::{Burned, EventBuffer};
use crate::interfaces::{AssetLedger, Clock, MarketMakingDelegate, PriceOracle};
use crate::logic::burn_amounts;
use crate::math::mul_div_down;
use crate::state::ReentrancyGuard;
use crate::types::Address;
use crate::vault::Vault;

impl<O, L, D, C> Vault<O, L, D, C>
where
    O: PriceOracle,
    L: AssetLedger,
    D: MarketMakingDelegate,
    C: Clock,
{
    /// Burn `shares` from `caller`, receiving at least the given minima.
    /// Returns `(base_out, quote_out)`.
    pub fn burn(
        &mut self,
        caller: Address,
        shares: u128,
        min_base_out: u128,
        min_quote_out: u128,
    ) -> VaultResult<(u128, u128)> {
        ReentrancyGuard::acquire(&mut self.lock)?;
        let result = self.burn_locked(caller, shares, min_base_out, min_quote_out);
        ReentrancyGuard::release(&mut self.lock);
        result
    }

    fn burn_locked(
        &mut self,
        caller: Address,
        shares: u128,
        min_base_out: u128,
        min_quote_out: u128,
    ) -> VaultResult<(u128, u128)> {
        if shares == 0 {
            return Err(VaultError::ZeroAmount);
        }
        if caller == self.state.vault {
            return Err(VaultError::VaultCannotBurn);
        }

        let now = self.clock.now();
        let mut state = self.state.clone();
        let mut events = EventBuffer::default();

        let accrual = self.accrue_fees(&mut state, &mut events, now)?;
        Self::commit_checkpoint(&mut state, &mut events, accrual.value_in_quote, now);

        let shares_before = state.total_shares();
        state.shares.burn(&caller, shares)?;

        let (base_balance, quote_balance) = self.total_balances();
        let (base_out, quote_out) = burn_amounts(shares, base_balance, quote_balance, shares_before)?;
        if base_out < min_base_out || quote_out < min_quote_out {
            return Err(VaultError::SlippageExceeded);
        }

        let (idle_base, idle_quote) = self.idle_balances();
        let shortfall_base = base_out.saturating_sub(idle_base);
        let shortfall_quote = quote_out.saturating_sub(idle_quote);
        if shortfall_base > 0 || shortfall_quote > 0 {
            info!(shortfall_base, shortfall_quote, "withdrawing shortfall from reserve");
            let vault = state.vault;
            if let Err(err) =
                self.delegate
                    .withdraw_funds(&mut self.ledger, shortfall_base, shortfall_quote, &vault)
            {
                self.update_position();
                return Err(VaultError::delegate(err));
            }
        }

        if let Err(err) =
            self.pay_out(&state.base, &state.quote, &state.vault, &caller, base_out, quote_out)
        {
            // Anything already pulled from the reserve goes back to work
            self.update_position();
            return Err(err);
        }

        // Withdrawn value leaves the peak in proportion
        let remaining = state.total_shares();
        state.checkpoint.high_water_mark =
            mul_div_down(state.checkpoint.high_water_mark, remaining, shares_before)?;
        let (value_after, _) = self.total_in_quote();
        Self::commit_checkpoint(&mut state, &mut events, value_after, now);

        events.emit(Burned {
            user: caller,
            shares,
            base_amount: base_out,
            quote_amount: quote_out,
            tick: accrual.tick,
            timestamp: now,
        });
        self.commit(state, events);

        info!(
            user = %caller,
            shares,
            base_out,
            quote_out,
            "burned shares"
        );

        self.update_position();
        Ok((base_out, quote_out))
    }

    fn pay_out(
        &mut self,
        base: &Address,
        quote: &Address,
        vault: &Address,
        to: &Address,
        base_out: u128,
        quote_out: u128,
    ) -> VaultResult<()> {
        for (asset, amount) in [(base, base_out), (quote, quote_out)] {
            let idle = self.ledger.balance_of(asset, vault);
            if idle < amount {
                return Err(VaultError::Ledger(format!(
                    "vault holds {} of {}, owes {}",
                    idle, asset, amount
                )));
            }
        }
        if base_out > 0 {
            self.ledger
                .transfer(base, vault, to, base_out)
                .map_err(VaultError::ledger)?;
        }
        if quote_out > 0 {
            self.ledger
                .transfer(quote, vault, to, quote_out)
                .map_err(VaultError::ledger)?;
        }
        Ok(())
    }
}
