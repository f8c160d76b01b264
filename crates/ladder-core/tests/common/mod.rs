//! Shared test infrastructure for the vault integration tests

#![allow(dead_code)]

pub mod collaborators;
pub mod tracing;

pub use collaborators::{FixedOracle, FixedPriceRouter, InMemoryLedger, ManualClock, RecordingVenue};
pub use self::tracing::init_test_tracing;

use ladder_core::{Address, FundsState, Position, Vault, VaultState};

pub type TestVault = Vault<FixedOracle, InMemoryLedger, RecordingVenue, ManualClock>;

pub const VAULT: Address = Address::repeat_byte(0x10);
pub const BASE: Address = Address::repeat_byte(0xba);
pub const QUOTE: Address = Address::repeat_byte(0xc0);
pub const MANAGER: Address = Address::repeat_byte(0x4d);
pub const VENUE: Address = Address::repeat_byte(0x7e);
pub const ROUTER: Address = Address::repeat_byte(0x52);
pub const RECIPIENT: Address = Address::repeat_byte(0xfe);
pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);

pub const START_TIME: u64 = 1_700_000_000;

/// Fresh vault at tick 0 with funds held in custody
pub fn setup_vault(quote_decimals_offset: u8) -> TestVault {
    init_test_tracing();
    let state = VaultState::new(VAULT, BASE, QUOTE, MANAGER, quote_decimals_offset)
        .expect("valid vault state");
    Vault::new(
        state,
        FixedOracle { tick: 0 },
        InMemoryLedger::default(),
        RecordingVenue::new(VENUE, BASE, QUOTE),
        ManualClock { now: START_TIME },
    )
}

/// Give `holder` spendable base and quote
pub fn fund(vault: &mut TestVault, holder: Address, base: u128, quote: u128) {
    vault.ledger_mut().mint(BASE, holder, base);
    vault.ledger_mut().mint(QUOTE, holder, quote);
}

/// First deposit of `amount` base and `amount` quote at parity, returning user shares
pub fn seed_vault(vault: &mut TestVault, holder: Address, amount: u128) -> u128 {
    fund(vault, holder, amount, amount);
    let preview = vault.preview_mint(amount, amount).expect("preview");
    vault
        .mint(holder, preview.shares, amount, amount)
        .expect("seed mint")
        .shares
}

/// Ladder of `price_points` rungs spaced 10 ticks apart, centred on tick 0
pub fn ladder(price_points: u32, step_size: u32, funds_state: FundsState) -> Position {
    Position {
        tick_index0: -(10 * (price_points as i32 / 2)) + 5,
        tick_offset: 10,
        step_size,
        price_points,
        gas_hint: 0,
        gas_price_hint: 0,
        funds_state,
    }
}
