//! # Ladder Core - Share Vault over a Geometric Market-Making Ladder
//!
//! A vault pools two assets (base and quote), issues fungible shares against
//! them, charges management and performance fees by share dilution, and keeps
//! the pooled funds working on an external venue as a geometric ladder of bids
//! and asks around the oracle price.
//!
//! - `logic`: pure share math, fee accrual and ladder planning
//! - `state`: the vault's owned state
//! - `instructions`: mint, burn, swap, funds placement and configuration
//! - `interfaces`: traits for the oracle, clock, asset ledger, venue and swap router
//! - `config`: TOML configuration surface

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod interfaces;
pub mod logic;
pub mod math;
pub mod state;
pub mod types;
pub mod vault;

// Re-export commonly used items
pub use config::VaultConfig;
pub use constants::*;
pub use error::{ExternalError, VaultError, VaultResult};
pub use events::{PositionOutcome, VaultEvent};
pub use interfaces::*;
pub use logic::{Distribution, DistributionOffer, MintAmounts, OfferSide, PlannedDistribution};
pub use math::{Rounding, Tick};
pub use state::{Checkpoint, FeeData, FundsState, Position, VaultState};
pub use types::Address;
pub use vault::{FeeAccrual, Vault};
