//! # Vault Business Logic
//!
//! Pure computations behind the vault operations. Nothing here touches a
//! collaborator; callers feed in balances, ticks and timestamps.

pub mod distribution;
pub mod fee_accrual;
pub mod share_math;

pub use distribution::*;
pub use fee_accrual::*;
pub use share_math::*;
