//! Funds placement
//!
//! Drives idle custody, the reserve and the resting ladder towards the
//! configured [`FundsState`]. Runs after every mint, burn, swap and position
//! change and may be called again at any time; repeating it with unchanged
//! inputs changes nothing, reposts nothing and emits nothing.
//!
//! A failure here never undoes the operation that triggered it. Posting
//! failures fall back to retracting the ladder; any other collaborator failure
//! is reported as a degraded outcome, leaving funds wherever they are.

use tracing::{debug, info, warn};

use crate::error::{VaultError, VaultResult};
use crate::events::{EventBuffer, LadderPosted, LadderRetracted, PositionOutcome, PositionUpdated};
use crate::interfaces::{AssetLedger, Clock, MarketMakingDelegate, PriceOracle};
use crate::logic::plan_distribution;
use crate::math::Tick;
use crate::state::{FundsState, Position};
use crate::vault::Vault;

impl<O, L, D, C> Vault<O, L, D, C>
where
    O: PriceOracle,
    L: AssetLedger,
    D: MarketMakingDelegate,
    C: Clock,
{
    /// Re-run funds placement for the current state
    pub(crate) fn update_position(&mut self) -> PositionOutcome {
        let mut events = EventBuffer::default();
        let position = self.state.position;
        let tick = self.oracle.current_tick();
        let funds_before = (self.idle_balances(), self.reserve_balances());

        let outcome = match self.place_funds(&position, tick, &mut events) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%err, funds_state = ?position.funds_state, "position update degraded");
                PositionOutcome::Degraded {
                    reason: err.to_string(),
                }
            }
        };

        let funds_moved = funds_before != (self.idle_balances(), self.reserve_balances());
        let degraded = matches!(outcome, PositionOutcome::Degraded { .. });
        if funds_moved || degraded || !events.is_empty() {
            events.emit(PositionUpdated {
                funds_state: position.funds_state,
                tick,
                outcome: outcome.clone(),
            });
        }
        events.flush_into(&mut self.events);
        outcome
    }

    fn place_funds(
        &mut self,
        position: &Position,
        tick: Tick,
        events: &mut EventBuffer,
    ) -> VaultResult<PositionOutcome> {
        match position.funds_state {
            FundsState::Active => {
                self.sweep_idle_into_reserve()?;
                match self.post_planned_ladder(position, tick, events) {
                    Ok(()) => Ok(PositionOutcome::Posted),
                    Err(reason) => {
                        warn!(%reason, "ladder not posted, retracting");
                        self.retract(events, reason)?;
                        Ok(PositionOutcome::Retracted)
                    }
                }
            }
            FundsState::Passive => {
                self.sweep_idle_into_reserve()?;
                self.retract(events, "passive".to_string())?;
                Ok(PositionOutcome::Retracted)
            }
            FundsState::Vault => {
                self.retract(events, "vault".to_string())?;
                self.withdraw_reserve()?;
                Ok(PositionOutcome::Withdrawn)
            }
        }
    }

    /// Plan against the reserve and post; `Err` carries why nothing was posted
    fn post_planned_ladder(
        &mut self,
        position: &Position,
        tick: Tick,
        events: &mut EventBuffer,
    ) -> Result<(), String> {
        let (reserve_base, reserve_quote) = self.reserve_balances();
        let min_viable = self.delegate.min_viable_volumes(position.gas_hint);
        let planned = plan_distribution(position, tick, reserve_base, reserve_quote, min_viable)
            .map_err(|err| err.to_string())?;
        if !planned.valid {
            return Err(format!(
                "ladder not viable: {} bids of {}, {} asks of {}",
                planned.live_bids, planned.bid_gives, planned.live_asks, planned.ask_gives
            ));
        }

        let unchanged = self.posted.as_ref() == Some(&planned.distribution);
        if unchanged && self.delegate.has_live_ladder() {
            debug!(first_ask_index = planned.first_ask_index, "ladder unchanged");
            return Ok(());
        }

        self.delegate
            .post_ladder(&planned.distribution, position)
            .map_err(|err| format!("venue rejected ladder: {}", err))?;
        self.posted = Some(planned.distribution.clone());

        info!(
            first_ask_index = planned.first_ask_index,
            live_bids = planned.live_bids,
            live_asks = planned.live_asks,
            "ladder posted"
        );
        events.emit(LadderPosted {
            first_ask_index: planned.first_ask_index,
            live_bids: planned.live_bids,
            live_asks: planned.live_asks,
            bid_gives: planned.bid_gives,
            ask_gives: planned.ask_gives,
        });
        Ok(())
    }

    fn sweep_idle_into_reserve(&mut self) -> VaultResult<()> {
        let (idle_base, idle_quote) = self.idle_balances();
        if idle_base == 0 && idle_quote == 0 {
            return Ok(());
        }

        let vault = self.state.vault;
        let spender = self.delegate.address();
        for (asset, amount) in [(self.state.base, idle_base), (self.state.quote, idle_quote)] {
            if amount > 0 {
                self.ledger
                    .approve(&asset, &vault, &spender, amount)
                    .map_err(VaultError::ledger)?;
            }
        }
        self.delegate
            .deposit_funds(&mut self.ledger, &vault, idle_base, idle_quote)
            .map_err(VaultError::delegate)?;
        info!(idle_base, idle_quote, "swept idle funds into reserve");
        Ok(())
    }

    fn withdraw_reserve(&mut self) -> VaultResult<()> {
        let (reserve_base, reserve_quote) = self.reserve_balances();
        if reserve_base == 0 && reserve_quote == 0 {
            return Ok(());
        }
        let vault = self.state.vault;
        self.delegate
            .withdraw_funds(&mut self.ledger, reserve_base, reserve_quote, &vault)
            .map_err(VaultError::delegate)?;
        info!(reserve_base, reserve_quote, "withdrew reserve into vault custody");
        Ok(())
    }

    fn retract(&mut self, events: &mut EventBuffer, reason: String) -> VaultResult<()> {
        let had_ladder = self.delegate.has_live_ladder();
        self.delegate.retract_ladder().map_err(VaultError::delegate)?;
        self.posted = None;
        if had_ladder {
            events.emit(LadderRetracted { reason });
        }
        Ok(())
    }
}
