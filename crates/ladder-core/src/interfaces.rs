//! Collaborator seams
//!
//! The vault owns its share and fee accounting; everything else it touches lives
//! behind these traits: the price source, wall time, token custody, the
//! market-making venue and the swap router. Failures cross the seam as
//! [`ExternalError`] and are mapped onto [`crate::error::VaultError`] by the
//! caller.

use serde::{Deserialize, Serialize};

use crate::error::ExternalError;
use crate::logic::Distribution;
use crate::math::Tick;
use crate::state::Position;
use crate::types::Address;

/// Source of the current base/quote price
pub trait PriceOracle {
    /// Tick where `1.0001^tick` is quote per base
    fn current_tick(&self) -> Tick;
}

/// Unix timestamp source
pub trait Clock {
    fn now(&self) -> u64;
}

/// Fungible token balances across holders
pub trait AssetLedger {
    fn balance_of(&self, asset: &Address, holder: &Address) -> u128;

    fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ExternalError>;

    fn approve(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), ExternalError>;

    fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> u128;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance
    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ExternalError>;
}

/// Market-making venue holding the vault's reserve and its resting ladder
pub trait MarketMakingDelegate {
    /// Custody identity of the reserve, used as the spender for deposits
    fn address(&self) -> Address;

    /// `(base, quote)` held in the reserve on the vault's behalf
    fn reserve_balances(&self, ledger: &dyn AssetLedger) -> (u128, u128);

    /// Pull funds from `from` into the reserve using its allowance
    fn deposit_funds(
        &mut self,
        ledger: &mut dyn AssetLedger,
        from: &Address,
        base: u128,
        quote: u128,
    ) -> Result<(), ExternalError>;

    /// Release funds from the reserve to `to`
    fn withdraw_funds(
        &mut self,
        ledger: &mut dyn AssetLedger,
        base: u128,
        quote: u128,
        to: &Address,
    ) -> Result<(), ExternalError>;

    /// Replace any resting ladder with `distribution`
    fn post_ladder(
        &mut self,
        distribution: &Distribution,
        position: &Position,
    ) -> Result<(), ExternalError>;

    /// Take every resting offer down; funds stay in the reserve
    fn retract_ladder(&mut self) -> Result<(), ExternalError>;

    /// Smallest `(bid, ask)` per-offer volumes the venue accepts
    fn min_viable_volumes(&self, gas_hint: u32) -> (u128, u128);

    fn has_live_ladder(&self) -> bool;
}

/// Manager-directed exchange request: deliver `amount_out` of `token_out`
/// from the vault in exchange for `token_in`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub vault: Address,
    pub token_out: Address,
    pub token_in: Address,
    pub amount_out: u128,
}

/// External router trusted with a temporary allowance during a swap
pub trait SwapExecutor {
    fn address(&self) -> Address;

    fn execute(
        &mut self,
        ledger: &mut dyn AssetLedger,
        request: &SwapRequest,
    ) -> Result<(), ExternalError>;
}
