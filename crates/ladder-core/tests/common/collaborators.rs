//! In-memory collaborators: token ledger, oracle, clock, venue and swap router

use std::collections::{HashMap, HashSet};

use ladder_core::{
    Address, AssetLedger, Clock, Distribution, ExternalError, MarketMakingDelegate, Position,
    PriceOracle, SwapExecutor, SwapRequest, Tick,
};

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(Address, Address), u128>,
    allowances: HashMap<(Address, Address, Address), u128>,
    /// Transfers of these assets fail
    pub frozen_assets: HashSet<Address>,
}

impl InMemoryLedger {
    /// Credit `amount` out of thin air
    pub fn mint(&mut self, asset: Address, holder: Address, amount: u128) {
        *self.balances.entry((asset, holder)).or_insert(0) += amount;
    }

    /// Debit `amount` into thin air
    pub fn burn(&mut self, asset: Address, holder: Address, amount: u128) {
        let balance = self.balances.entry((asset, holder)).or_insert(0);
        *balance = balance.saturating_sub(amount);
    }

    fn move_funds(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ExternalError> {
        if self.frozen_assets.contains(asset) {
            return Err(ExternalError::new(format!("asset {} frozen", asset)));
        }
        let from_balance = self.balance_of(asset, from);
        if from_balance < amount {
            return Err(ExternalError::new(format!(
                "insufficient balance: {} < {}",
                from_balance, amount
            )));
        }
        self.balances.insert((*asset, *from), from_balance - amount);
        *self.balances.entry((*asset, *to)).or_insert(0) += amount;
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: &Address, holder: &Address) -> u128 {
        self.balances.get(&(*asset, *holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ExternalError> {
        self.move_funds(asset, from, to, amount)
    }

    fn approve(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), ExternalError> {
        self.allowances.insert((*asset, *owner, *spender), amount);
        Ok(())
    }

    fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*asset, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ExternalError> {
        let allowance = self.allowance(asset, from, spender);
        if allowance < amount {
            return Err(ExternalError::new(format!(
                "allowance exceeded: {} < {}",
                allowance, amount
            )));
        }
        self.move_funds(asset, from, to, amount)?;
        self.allowances
            .insert((*asset, *from, *spender), allowance - amount);
        Ok(())
    }
}

// ============================================================================
// Oracle and clock
// ============================================================================

#[derive(Debug, Default)]
pub struct FixedOracle {
    pub tick: Tick,
}

impl PriceOracle for FixedOracle {
    fn current_tick(&self) -> Tick {
        self.tick
    }
}

#[derive(Debug, Default)]
pub struct ManualClock {
    pub now: u64,
}

impl ManualClock {
    pub fn advance(&mut self, seconds: u64) {
        self.now += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now
    }
}

// ============================================================================
// Venue
// ============================================================================

/// Market-making venue that records every call
#[derive(Debug)]
pub struct RecordingVenue {
    pub address: Address,
    pub base: Address,
    pub quote: Address,
    pub live: Option<Distribution>,
    pub posts: usize,
    pub retracts: usize,
    pub fail_post: bool,
    pub fail_withdraw: bool,
    /// Held back from each leg of every withdrawal
    pub withhold: u128,
    pub min_volumes: (u128, u128),
}

impl RecordingVenue {
    pub fn new(address: Address, base: Address, quote: Address) -> Self {
        Self {
            address,
            base,
            quote,
            live: None,
            posts: 0,
            retracts: 0,
            fail_post: false,
            fail_withdraw: false,
            withhold: 0,
            min_volumes: (0, 0),
        }
    }
}

impl MarketMakingDelegate for RecordingVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn reserve_balances(&self, ledger: &dyn AssetLedger) -> (u128, u128) {
        (
            ledger.balance_of(&self.base, &self.address),
            ledger.balance_of(&self.quote, &self.address),
        )
    }

    fn deposit_funds(
        &mut self,
        ledger: &mut dyn AssetLedger,
        from: &Address,
        base: u128,
        quote: u128,
    ) -> Result<(), ExternalError> {
        let venue = self.address;
        if base > 0 {
            ledger.transfer_from(&self.base, &venue, from, &venue, base)?;
        }
        if quote > 0 {
            ledger.transfer_from(&self.quote, &venue, from, &venue, quote)?;
        }
        Ok(())
    }

    fn withdraw_funds(
        &mut self,
        ledger: &mut dyn AssetLedger,
        base: u128,
        quote: u128,
        to: &Address,
    ) -> Result<(), ExternalError> {
        if self.fail_withdraw {
            return Err(ExternalError::new("withdrawals paused"));
        }
        let venue = self.address;
        let base = base.saturating_sub(self.withhold);
        let quote = quote.saturating_sub(self.withhold);
        if base > 0 {
            ledger.transfer(&self.base, &venue, to, base)?;
        }
        if quote > 0 {
            ledger.transfer(&self.quote, &venue, to, quote)?;
        }
        Ok(())
    }

    fn post_ladder(
        &mut self,
        distribution: &Distribution,
        _position: &Position,
    ) -> Result<(), ExternalError> {
        if self.fail_post {
            return Err(ExternalError::new("chunk rejected"));
        }
        self.posts += 1;
        self.live = Some(distribution.clone());
        Ok(())
    }

    fn retract_ladder(&mut self) -> Result<(), ExternalError> {
        self.retracts += 1;
        self.live = None;
        Ok(())
    }

    fn min_viable_volumes(&self, _gas_hint: u32) -> (u128, u128) {
        self.min_volumes
    }

    fn has_live_ladder(&self) -> bool {
        self.live.is_some()
    }
}

// ============================================================================
// Swap router
// ============================================================================

/// Router filling at a fixed quote-per-base price `price_num / price_den`
#[derive(Debug)]
pub struct FixedPriceRouter {
    pub address: Address,
    pub base: Address,
    pub price_num: u128,
    pub price_den: u128,
    /// Amount withheld from every fill
    pub haircut: u128,
}

impl SwapExecutor for FixedPriceRouter {
    fn address(&self) -> Address {
        self.address
    }

    fn execute(
        &mut self,
        ledger: &mut dyn AssetLedger,
        request: &SwapRequest,
    ) -> Result<(), ExternalError> {
        let router = self.address;
        ledger.transfer_from(
            &request.token_out,
            &router,
            &request.vault,
            &router,
            request.amount_out,
        )?;

        let amount_in = if request.token_out == self.base {
            request.amount_out * self.price_num / self.price_den
        } else {
            request.amount_out * self.price_den / self.price_num
        };
        ledger.transfer(
            &request.token_in,
            &router,
            &request.vault,
            amount_in.saturating_sub(self.haircut),
        )
    }
}
