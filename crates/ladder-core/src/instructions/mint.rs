//! Mint instruction
//!
//! Deposit base and quote in exchange for vault shares. The first deposit into an
//! empty vault prices shares off the oracle and locks MINIMUM_LIQUIDITY dead
//! shares in the vault; later deposits pay a ceil-rounded pro rata slice of the
//! pool.

use tracing::{info, warn};

use crate::constants::MINIMUM_LIQUIDITY;
use crate::error::{VaultError, VaultResult};
use crate::events::{EventBuffer, Minted};
use crate::interfaces::{AssetLedger, Clock, MarketMakingDelegate, PriceOracle};
use crate::logic::{initial_mint_amounts, mint_amounts_for_shares, MintAmounts};
use crate::math::{quote_from_base, safe_add_u128, Rounding};
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
    /// Mint exactly `shares` to `caller`, paying at most `max_base` and `max_quote`
    pub fn mint(
        &mut self,
        caller: Address,
        shares: u128,
        max_base: u128,
        max_quote: u128,
    ) -> VaultResult<MintAmounts> {
        ReentrancyGuard::acquire(&mut self.lock)?;
        let result = self.mint_locked(caller, shares, max_base, max_quote);
        ReentrancyGuard::release(&mut self.lock);
        result
    }

    fn mint_locked(
        &mut self,
        caller: Address,
        shares: u128,
        max_base: u128,
        max_quote: u128,
    ) -> VaultResult<MintAmounts> {
        if shares == 0 {
            return Err(VaultError::ZeroAmount);
        }
        caller.require_non_zero()?;
        if caller == self.state.vault {
            return Err(VaultError::VaultCannotMint);
        }

        let now = self.clock.now();
        let mut state = self.state.clone();
        let mut events = EventBuffer::default();

        let accrual = self.accrue_fees(&mut state, &mut events, now)?;
        Self::commit_checkpoint(&mut state, &mut events, accrual.value_in_quote, now);
        let tick = accrual.tick;

        let total_shares = state.total_shares();
        let (base_in, quote_in) = if total_shares == 0 {
            let initial = initial_mint_amounts(max_base, max_quote, tick, state.quote_scale)?;
            if initial.shares != shares {
                return Err(VaultError::InitialMintSharesMismatch {
                    expected: shares,
                    computed: initial.shares,
                });
            }
            (initial.base, initial.quote)
        } else {
            let (base_balance, quote_balance) = self.total_balances();
            mint_amounts_for_shares(shares, base_balance, quote_balance, total_shares)?
        };

        if base_in > max_base || quote_in > max_quote {
            return Err(VaultError::SlippageExceeded);
        }
        if base_in == 0 && quote_in == 0 {
            // Nothing backs the existing supply
            return Err(VaultError::ZeroAmount);
        }

        let deposit_value = quote_from_base(base_in, tick, Rounding::Up)
            .and_then(|base_value| safe_add_u128(base_value, quote_in))
            .map_err(|_| VaultError::QuoteAmountOverflow)?;
        let new_value = safe_add_u128(state.checkpoint.last_value_in_quote, deposit_value)
            .map_err(|_| VaultError::QuoteAmountOverflow)?;
        if new_value > state.max_total_in_quote {
            return Err(VaultError::DepositExceedsMaxTotal {
                value: new_value,
                max: state.max_total_in_quote,
            });
        }

        state.shares.mint(caller, shares)?;
        if total_shares == 0 {
            state.shares.mint(state.vault, MINIMUM_LIQUIDITY)?;
        }

        self.pull_deposit(&state.base, &state.quote, &caller, &state.vault, base_in, quote_in)?;

        // Deposited value is not performance
        state.checkpoint.high_water_mark =
            state.checkpoint.high_water_mark.saturating_add(deposit_value);
        Self::commit_checkpoint(&mut state, &mut events, new_value, now);

        events.emit(Minted {
            user: caller,
            shares,
            base_amount: base_in,
            quote_amount: quote_in,
            tick,
            timestamp: now,
        });
        self.commit(state, events);

        info!(
            user = %caller,
            shares,
            base_in,
            quote_in,
            tick,
            "minted shares"
        );

        self.update_position();
        Ok(MintAmounts {
            shares,
            base: base_in,
            quote: quote_in,
        })
    }

    /// Move the deposit into vault custody, refunding base if quote fails
    fn pull_deposit(
        &mut self,
        base: &Address,
        quote: &Address,
        from: &Address,
        vault: &Address,
        base_in: u128,
        quote_in: u128,
    ) -> VaultResult<()> {
        for (asset, amount) in [(base, base_in), (quote, quote_in)] {
            let balance = self.ledger.balance_of(asset, from);
            if balance < amount {
                return Err(VaultError::Ledger(format!(
                    "insufficient balance of {}: {} < {}",
                    asset, balance, amount
                )));
            }
        }

        if base_in > 0 {
            self.ledger
                .transfer(base, from, vault, base_in)
                .map_err(VaultError::ledger)?;
        }
        if quote_in > 0 {
            if let Err(err) = self.ledger.transfer(quote, from, vault, quote_in) {
                if base_in > 0 {
                    if let Err(refund_err) = self.ledger.transfer(base, vault, from, base_in) {
                        warn!(%refund_err, "failed to refund base after quote transfer failure");
                    }
                }
                return Err(VaultError::ledger(err));
            }
        }
        Ok(())
    }
}
