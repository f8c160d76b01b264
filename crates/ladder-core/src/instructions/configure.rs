//! Manager configuration instructions and share transfers

use tracing::info;

use crate::error::{VaultError, VaultResult};
use crate::events::{
    EventBuffer, FeeDataUpdated, MaxTotalInQuoteUpdated, PositionOutcome, SwapContractUpdated,
    TokenWithdrawn,
};
use crate::interfaces::{AssetLedger, Clock, MarketMakingDelegate, PriceOracle};
use crate::state::{FeeData, Position};
use crate::types::Address;
use crate::vault::Vault;

impl<O, L, D, C> Vault<O, L, D, C>
where
    O: PriceOracle,
    L: AssetLedger,
    D: MarketMakingDelegate,
    C: Clock,
{
    /// Replace fee rates and recipient. Fees owed under the old rates are
    /// accrued and checkpointed first.
    pub fn set_fee_data(&mut self, caller: Address, fee_data: FeeData) -> VaultResult<()> {
        self.state.require_manager(&caller)?;
        fee_data.validate()?;
        if fee_data.fee_recipient == self.state.vault {
            return Err(VaultError::VaultCannotMint);
        }

        let now = self.clock.now();
        let mut state = self.state.clone();
        let mut events = EventBuffer::default();

        let accrual = self.accrue_fees(&mut state, &mut events, now)?;
        Self::commit_checkpoint(&mut state, &mut events, accrual.value_in_quote, now);

        state.fee_data = fee_data;
        events.emit(FeeDataUpdated { fee_data });
        self.commit(state, events);

        info!(
            performance_fee = fee_data.performance_fee,
            management_fee = fee_data.management_fee,
            recipient = %fee_data.fee_recipient,
            "fee data updated"
        );
        Ok(())
    }

    pub fn set_max_total_in_quote(&mut self, caller: Address, max_total_in_quote: u128) -> VaultResult<()> {
        self.state.require_manager(&caller)?;

        let mut state = self.state.clone();
        let mut events = EventBuffer::default();
        state.max_total_in_quote = max_total_in_quote;
        events.emit(MaxTotalInQuoteUpdated { max_total_in_quote });
        self.commit(state, events);

        info!(max_total_in_quote, "deposit cap updated");
        Ok(())
    }

    /// Apply new ladder parameters and funds state, then re-place funds
    pub fn set_position(&mut self, caller: Address, position: Position) -> VaultResult<PositionOutcome> {
        self.state.require_manager(&caller)?;
        position.validate()?;

        self.state.position = position;
        info!(
            funds_state = ?position.funds_state,
            tick_index0 = position.tick_index0,
            tick_offset = position.tick_offset,
            step_size = position.step_size,
            price_points = position.price_points,
            "position updated"
        );
        Ok(self.update_position())
    }

    pub fn set_swap_contract(&mut self, caller: Address, executor: Address, allowed: bool) -> VaultResult<()> {
        self.state.require_manager(&caller)?;
        executor.require_non_zero()?;

        let mut state = self.state.clone();
        let mut events = EventBuffer::default();
        if allowed {
            state.allowed_swap_contracts.insert(executor);
        } else {
            state.allowed_swap_contracts.remove(&executor);
        }
        events.emit(SwapContractUpdated { executor, allowed });
        self.commit(state, events);

        info!(executor = %executor, allowed, "swap contract updated");
        Ok(())
    }

    /// Recover a stray non-pool asset from vault custody
    pub fn withdraw_token(
        &mut self,
        caller: Address,
        asset: Address,
        amount: u128,
        to: Address,
    ) -> VaultResult<()> {
        self.state.require_manager(&caller)?;
        if self.state.is_pool_token(&asset) {
            return Err(VaultError::CannotWithdrawPoolToken);
        }
        to.require_non_zero()?;

        let vault = self.state.vault;
        self.ledger
            .transfer(&asset, &vault, &to, amount)
            .map_err(VaultError::ledger)?;

        let mut events = EventBuffer::default();
        events.emit(TokenWithdrawn { asset, to, amount });
        events.flush_into(&mut self.events);

        info!(asset = %asset, to = %to, amount, "withdrew non-pool token");
        Ok(())
    }

    /// Re-run funds placement, e.g. from a keeper after the oracle moved
    pub fn refresh_position(&mut self) -> PositionOutcome {
        self.update_position()
    }

    /// Move shares between holders
    pub fn transfer_shares(&mut self, from: Address, to: Address, amount: u128) -> VaultResult<()> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        // Dead shares stay at exactly MINIMUM_LIQUIDITY
        if from == self.state.vault || to == self.state.vault {
            return Err(VaultError::VaultCannotTransfer);
        }
        let mut state = self.state.clone();
        state.shares.transfer(&from, to, amount)?;
        self.commit(state, EventBuffer::default());
        Ok(())
    }
}
