//! # Vault Constants
//!
//! - Share supply floor
//! - Fee bounds and precisions
//! - Tick bounds

// ============================================================================
// Share Constants
// ============================================================================

/// Shares locked forever on the first mint
pub const MINIMUM_LIQUIDITY: u128 = 1_000;

/// Largest decimals offset between the share token and the quote asset
pub const MAX_QUOTE_DECIMALS_OFFSET: u8 = 18;

// ============================================================================
// Fee Constants
// ============================================================================

/// Performance fee denominator (100_000 = 100%)
pub const PERFORMANCE_FEE_PRECISION: u128 = 100_000;

/// Maximum performance fee (50%)
pub const MAX_PERFORMANCE_FEE: u32 = 50_000;

/// Seconds in a 365 day year
pub const SECONDS_PER_YEAR: u128 = 365 * 24 * 60 * 60;

/// Management fee denominator: rate is per year, accrual is per second
pub const MANAGEMENT_FEE_PRECISION: u128 = 100_000 * SECONDS_PER_YEAR;

/// Maximum management fee (5% per year)
pub const MAX_MANAGEMENT_FEE: u32 = 5_000;

// ============================================================================
// Tick Constants
// ============================================================================

/// Minimum tick, price = 1.0001^MIN_TICK
pub const MIN_TICK: i32 = -887_272;

/// Maximum tick
pub const MAX_TICK: i32 = 887_272;
