//! # Vault
//!
//! The orchestrator: owns [`VaultState`] and the collaborators, exposes the read
//! views and the helpers shared by the operations in [`crate::instructions`].
//!
//! Mutating operations follow one pattern: clone the state, run accrual and
//! accounting against the clone while buffering events, and only swap the clone
//! in (and flush the events) once every fallible step has succeeded.

use tracing::{debug, info};

use crate::config::VaultConfig;
use crate::error::VaultResult;
use crate::events::{CheckpointUpdated, EventBuffer, FeesAccrued, VaultEvent};
use crate::interfaces::{AssetLedger, Clock, MarketMakingDelegate, PriceOracle};
use crate::logic::{
    burn_amounts, compute_fee_shares, plan_distribution, preview_mint, Distribution, MintAmounts,
    PlannedDistribution,
};
use crate::math::{quote_from_base, Rounding, Tick};
use crate::state::{FeeData, Position, ReentrancyGuard, ReentrancyStatus, VaultState};
use crate::types::Address;

/// Outcome of fee accrual against a working copy of the state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeAccrual {
    pub fee_shares: u128,
    pub value_in_quote: u128,
    pub tick: Tick,
}

/// Share vault running a geometric ladder on an external venue
pub struct Vault<O, L, D, C> {
    pub(crate) state: VaultState,
    pub(crate) oracle: O,
    pub(crate) ledger: L,
    pub(crate) delegate: D,
    pub(crate) clock: C,
    pub(crate) lock: ReentrancyStatus,
    pub(crate) events: Vec<VaultEvent>,
    /// Last ladder handed to the venue, cleared on retract
    pub(crate) posted: Option<Distribution>,
}

impl<O, L, D, C> Vault<O, L, D, C>
where
    O: PriceOracle,
    L: AssetLedger,
    D: MarketMakingDelegate,
    C: Clock,
{
    pub fn new(state: VaultState, oracle: O, ledger: L, delegate: D, clock: C) -> Self {
        Self {
            state,
            oracle,
            ledger,
            delegate,
            clock,
            lock: ReentrancyStatus::Unlocked,
            events: Vec::new(),
            posted: None,
        }
    }

    /// Build a vault from validated configuration
    pub fn from_config(
        config: &VaultConfig,
        oracle: O,
        ledger: L,
        delegate: D,
        clock: C,
    ) -> VaultResult<Self> {
        config.validate()?;
        let state = config.to_state()?;
        info!(
            vault = %state.vault,
            base = %state.base,
            quote = %state.quote,
            funds_state = ?state.position.funds_state,
            "vault created from config"
        );
        Ok(Self::new(state, oracle, ledger, delegate, clock))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &VaultState {
        &self.state
    }

    pub fn fee_data(&self) -> &FeeData {
        &self.state.fee_data
    }

    pub fn position(&self) -> &Position {
        &self.state.position
    }

    pub fn total_shares(&self) -> u128 {
        self.state.total_shares()
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.state.shares.balance_of(holder)
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn is_locked(&self) -> bool {
        ReentrancyGuard::is_locked(&self.lock)
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// `(base, quote)` held in vault custody
    pub fn idle_balances(&self) -> (u128, u128) {
        let vault = &self.state.vault;
        (
            self.ledger.balance_of(&self.state.base, vault),
            self.ledger.balance_of(&self.state.quote, vault),
        )
    }

    /// `(base, quote)` held by the market-making reserve
    pub fn reserve_balances(&self) -> (u128, u128) {
        self.delegate.reserve_balances(&self.ledger)
    }

    /// Idle plus reserve
    pub fn total_balances(&self) -> (u128, u128) {
        let (idle_base, idle_quote) = self.idle_balances();
        let (reserve_base, reserve_quote) = self.reserve_balances();
        (
            idle_base.saturating_add(reserve_base),
            idle_quote.saturating_add(reserve_quote),
        )
    }

    /// Floor-rounded `(base, quote)` claim of `shares`
    pub fn underlying_balances(&self, shares: u128) -> VaultResult<(u128, u128)> {
        let total = self.state.total_shares();
        if total == 0 {
            return Ok((0, 0));
        }
        let (base, quote) = self.total_balances();
        burn_amounts(shares.min(total), base, quote, total)
    }

    /// Pooled value in quote units together with the tick it was valued at
    pub fn total_in_quote(&self) -> (u128, Tick) {
        let tick = self.oracle.current_tick();
        let (base, quote) = self.total_balances();
        (value_in_quote(base, quote, tick), tick)
    }

    /// Shares and amounts a deposit bounded by the maxima would get right now.
    /// Ignores fees that would accrue first.
    pub fn preview_mint(&self, max_base: u128, max_quote: u128) -> VaultResult<MintAmounts> {
        let (base, quote) = self.total_balances();
        preview_mint(
            max_base,
            max_quote,
            base,
            quote,
            self.state.total_shares(),
            self.oracle.current_tick(),
            self.state.quote_scale,
        )
    }

    /// Ladder an update would post from the current reserve
    pub fn current_distribution(&self) -> VaultResult<PlannedDistribution> {
        let position = &self.state.position;
        let (reserve_base, reserve_quote) = self.reserve_balances();
        plan_distribution(
            position,
            self.oracle.current_tick(),
            reserve_base,
            reserve_quote,
            self.delegate.min_viable_volumes(position.gas_hint),
        )
    }

    // ========================================================================
    // Shared operation steps
    // ========================================================================

    /// Accrue fees into `state`, minting fee shares to the recipient. The
    /// checkpoint is left for the caller to commit.
    pub(crate) fn accrue_fees(
        &self,
        state: &mut VaultState,
        events: &mut EventBuffer,
        now: u64,
    ) -> VaultResult<FeeAccrual> {
        let (value, tick) = self.total_in_quote();
        let computation = compute_fee_shares(
            value,
            state.total_shares(),
            &state.checkpoint,
            &state.fee_data,
            now,
        );

        if computation.fee_shares > 0 {
            let recipient = state.fee_data.fee_recipient;
            state.shares.mint(recipient, computation.fee_shares)?;
            events.emit(FeesAccrued {
                recipient,
                fee_shares: computation.fee_shares,
                fee_value_in_quote: computation.fee_value,
                value_in_quote: value,
                timestamp: now,
            });
        }

        debug!(
            value_in_quote = value,
            tick,
            fee_shares = computation.fee_shares,
            "accrued fees"
        );
        Ok(FeeAccrual {
            fee_shares: computation.fee_shares,
            value_in_quote: value,
            tick,
        })
    }

    /// Persist a fresh valuation into `state`
    pub(crate) fn commit_checkpoint(
        state: &mut VaultState,
        events: &mut EventBuffer,
        value_in_quote: u128,
        now: u64,
    ) {
        state.checkpoint.commit(value_in_quote, now);
        events.emit(CheckpointUpdated {
            value_in_quote,
            high_water_mark: state.checkpoint.high_water_mark,
            timestamp: now,
        });
    }

    /// Swap in a working state and publish its events
    pub(crate) fn commit(&mut self, state: VaultState, events: EventBuffer) {
        self.state = state;
        events.flush_into(&mut self.events);
    }
}

/// Quote-equivalent value of a `(base, quote)` pair. Base converts rounding up;
/// overflow saturates.
pub fn value_in_quote(base: u128, quote: u128, tick: Tick) -> u128 {
    let base_value = quote_from_base(base, tick, Rounding::Up).unwrap_or(u128::MAX);
    quote.saturating_add(base_value)
}
