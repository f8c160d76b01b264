//! Manager swaps, allow-listing, emergency withdrawals and config bootstrap

mod common;

use common::*;
use ladder_core::{
    Address, AssetLedger, FundsState, Vault, VaultConfig, VaultError, VaultEvent,
};

fn router(haircut: u128) -> FixedPriceRouter {
    FixedPriceRouter {
        address: ROUTER,
        base: BASE,
        price_num: 1,
        price_den: 1,
        haircut,
    }
}

fn vault_with_router() -> TestVault {
    let mut vault = setup_vault(0);
    seed_vault(&mut vault, ALICE, 10_000);
    vault.ledger_mut().mint(BASE, ROUTER, 100_000);
    vault.ledger_mut().mint(QUOTE, ROUTER, 100_000);
    vault
        .set_swap_contract(MANAGER, ROUTER, true)
        .expect("allow router");
    vault.take_events();
    vault
}

#[test]
fn test_sell_swap_rebalances_custody() -> anyhow::Result<()> {
    let mut vault = vault_with_router();
    let mut executor = router(0);

    let amount_in = vault.swap(MANAGER, &mut executor, 1_000, 990, true)?;
    assert_eq!(amount_in, 1_000);
    assert_eq!(vault.idle_balances(), (9_000, 11_000));
    assert_eq!(vault.ledger().allowance(&BASE, &VAULT, &ROUTER), 0);
    assert!(!vault.is_locked());

    let events = vault.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        VaultEvent::Swapped(s) if s.sell && s.amount_out == 1_000 && s.amount_in == 1_000
    )));
    Ok(())
}

#[test]
fn test_buy_swap_from_reserve() -> anyhow::Result<()> {
    let mut vault = vault_with_router();
    vault.set_position(MANAGER, ladder(10, 1, FundsState::Active))?;
    assert_eq!(vault.idle_balances(), (0, 0));

    let mut executor = router(0);
    vault.swap(MANAGER, &mut executor, 2_000, 2_000, false)?;

    // Quote shortfall came out of the reserve, base proceeds were swept back in
    assert_eq!(vault.idle_balances(), (0, 0));
    assert_eq!(vault.reserve_balances(), (12_000, 8_000));
    assert!(vault.delegate().live.is_some());
    Ok(())
}

#[test]
fn test_swap_slippage_resets_allowance() {
    let mut vault = vault_with_router();
    let mut executor = router(20);

    assert_eq!(
        vault.swap(MANAGER, &mut executor, 1_000, 990, true),
        Err(VaultError::SlippageExceeded)
    );
    assert_eq!(vault.ledger().allowance(&BASE, &VAULT, &ROUTER), 0);
    assert!(!vault.is_locked());
}

#[test]
fn test_short_paid_swap_resizes_ladder() -> anyhow::Result<()> {
    let mut vault = vault_with_router();
    vault.set_position(MANAGER, ladder(10, 1, FundsState::Active))?;
    vault.take_events();
    let mut executor = router(20);

    assert_eq!(
        vault.swap(MANAGER, &mut executor, 1_000, 990, true),
        Err(VaultError::SlippageExceeded)
    );
    assert!(!vault.is_locked());
    assert_eq!(vault.ledger().allowance(&BASE, &VAULT, &ROUTER), 0);

    // The executor kept 1000 base and paid 980 quote; the ladder follows the reserve
    assert_eq!(vault.idle_balances(), (0, 0));
    let (reserve_base, reserve_quote) = vault.reserve_balances();
    assert_eq!((reserve_base, reserve_quote), (9_000, 10_980));
    let live = vault.delegate().live.clone().expect("ladder reposted");
    assert_eq!(live.total_ask_gives(), 9_000);
    assert!(live.total_bid_gives() <= reserve_quote);

    let events = vault.take_events();
    assert!(!events.iter().any(|e| matches!(e, VaultEvent::Swapped(_))));
    Ok(())
}

#[test]
fn test_swap_authorization() -> anyhow::Result<()> {
    let mut vault = vault_with_router();
    let mut executor = router(0);

    assert!(matches!(
        vault.swap(ALICE, &mut executor, 1_000, 0, true),
        Err(VaultError::Unauthorized(_))
    ));

    vault.set_swap_contract(MANAGER, ROUTER, false)?;
    assert!(matches!(
        vault.swap(MANAGER, &mut executor, 1_000, 0, true),
        Err(VaultError::UnauthorizedSwapContract(_))
    ));
    assert_eq!(
        vault.set_swap_contract(MANAGER, Address::ZERO, true),
        Err(VaultError::ZeroAddress)
    );
    assert_eq!(vault.idle_balances(), (10_000, 10_000));
    Ok(())
}

#[test]
fn test_withdraw_token_only_for_strays() -> anyhow::Result<()> {
    let mut vault = vault_with_router();
    let stray = Address::repeat_byte(0x99);
    vault.ledger_mut().mint(stray, VAULT, 500);

    assert_eq!(
        vault.withdraw_token(MANAGER, BASE, 1, BOB),
        Err(VaultError::CannotWithdrawPoolToken)
    );
    assert_eq!(
        vault.withdraw_token(MANAGER, stray, 500, Address::ZERO),
        Err(VaultError::ZeroAddress)
    );

    vault.withdraw_token(MANAGER, stray, 500, BOB)?;
    assert_eq!(vault.ledger().balance_of(&stray, &BOB), 500);
    Ok(())
}

#[test]
fn test_vault_from_config() -> anyhow::Result<()> {
    init_test_tracing();
    let toml = format!(
        r#"
vault = "{VAULT}"
base = "{BASE}"
quote = "{QUOTE}"
manager = "{MANAGER}"
quote_decimals_offset = 0
max_total_in_quote = "50000"
allowed_swap_contracts = ["{ROUTER}"]

[position]
tick_index0 = -45
tick_offset = 10
step_size = 1
price_points = 10
funds_state = "active"
"#
    );
    let config = VaultConfig::from_toml_str(&toml)?;
    let mut vault = Vault::from_config(
        &config,
        FixedOracle { tick: 0 },
        InMemoryLedger::default(),
        RecordingVenue::new(VENUE, BASE, QUOTE),
        ManualClock { now: START_TIME },
    )?;

    assert_eq!(vault.state().max_total_in_quote, 50_000);
    assert!(vault.state().allowed_swap_contracts.contains(&ROUTER));

    seed_vault(&mut vault, ALICE, 10_000);
    assert_eq!(vault.reserve_balances(), (10_000, 10_000));
    assert!(vault.delegate().live.is_some());
    Ok(())
}
