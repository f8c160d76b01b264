//! Vault state structures

pub mod fees;
pub mod position;
pub mod reentrancy;
pub mod shares;
pub mod vault_state;

pub use fees::*;
pub use position::*;
pub use reentrancy::*;
pub use shares::*;
pub use vault_state::*;
