//! Swap instruction
//!
//! Manager-directed rebalancing through an allow-listed executor. The executor
//! gets an allowance of exactly `amount_out` for the duration of the call and
//! must pay the inbound asset back into vault custody.

use tracing::{info, warn};

use crate::error::{VaultError, VaultResult};
use crate::events::{EventBuffer, Swapped};
use crate::interfaces::{
    AssetLedger, Clock, MarketMakingDelegate, PriceOracle, SwapExecutor, SwapRequest,
};
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
    /// Trade `amount_out` of base (`sell`) or quote (`!sell`) for at least
    /// `amount_in_min` of the other asset. Returns the amount received.
    pub fn swap<E: SwapExecutor>(
        &mut self,
        caller: Address,
        executor: &mut E,
        amount_out: u128,
        amount_in_min: u128,
        sell: bool,
    ) -> VaultResult<u128> {
        ReentrancyGuard::acquire(&mut self.lock)?;
        let result = self.swap_locked(caller, executor, amount_out, amount_in_min, sell);
        ReentrancyGuard::release(&mut self.lock);
        result
    }

    fn swap_locked<E: SwapExecutor>(
        &mut self,
        caller: Address,
        executor: &mut E,
        amount_out: u128,
        amount_in_min: u128,
        sell: bool,
    ) -> VaultResult<u128> {
        self.state.require_manager(&caller)?;
        let executor_address = executor.address();
        if !self.state.allowed_swap_contracts.contains(&executor_address) {
            return Err(VaultError::UnauthorizedSwapContract(
                executor_address.to_string(),
            ));
        }
        if amount_out == 0 {
            return Err(VaultError::ZeroAmount);
        }

        let (token_out, token_in) = if sell {
            (self.state.base, self.state.quote)
        } else {
            (self.state.quote, self.state.base)
        };
        let request = SwapRequest {
            vault: self.state.vault,
            token_out,
            token_in,
            amount_out,
        };

        let amount_in = match self.execute_swap(executor, &request, sell, amount_in_min) {
            Ok(amount_in) => amount_in,
            Err(err) => {
                // Reserve and custody may have moved; size the ladder to what is left
                self.update_position();
                return Err(err);
            }
        };

        let now = self.clock.now();
        let mut events = EventBuffer::default();
        events.emit(Swapped {
            executor: executor_address,
            sell,
            amount_out,
            amount_in,
            timestamp: now,
        });
        events.flush_into(&mut self.events);

        info!(
            executor = %executor_address,
            sell,
            amount_out,
            amount_in,
            "swap executed"
        );

        self.update_position();
        Ok(amount_in)
    }

    /// Fund custody, run the executor and measure what came back
    fn execute_swap<E: SwapExecutor>(
        &mut self,
        executor: &mut E,
        request: &SwapRequest,
        sell: bool,
        amount_in_min: u128,
    ) -> VaultResult<u128> {
        let vault = request.vault;
        let executor_address = executor.address();
        let token_out = request.token_out;
        let amount_out = request.amount_out;

        let idle_out = self.ledger.balance_of(&token_out, &vault);
        let shortfall = amount_out.saturating_sub(idle_out);
        if shortfall > 0 {
            let (base, quote) = if sell { (shortfall, 0) } else { (0, shortfall) };
            self.delegate
                .withdraw_funds(&mut self.ledger, base, quote, &vault)
                .map_err(VaultError::delegate)?;
        }
        let available = self.ledger.balance_of(&token_out, &vault);
        if available < amount_out {
            return Err(VaultError::Ledger(format!(
                "vault holds {} of {}, swap needs {}",
                available, token_out, amount_out
            )));
        }

        let in_before = self.ledger.balance_of(&request.token_in, &vault);
        self.ledger
            .approve(&token_out, &vault, &executor_address, amount_out)
            .map_err(VaultError::ledger)?;

        let executed = executor.execute(&mut self.ledger, request);

        if let Err(err) = self
            .ledger
            .approve(&token_out, &vault, &executor_address, 0)
        {
            warn!(%err, executor = %executor_address, "failed to reset swap allowance");
        }
        executed.map_err(VaultError::swap)?;

        let in_after = self.ledger.balance_of(&request.token_in, &vault);
        let amount_in = in_after.saturating_sub(in_before);
        if amount_in < amount_in_min {
            warn!(amount_in, amount_in_min, "swap returned less than minimum");
            return Err(VaultError::SlippageExceeded);
        }
        Ok(amount_in)
    }
}
