//! Ladder position parameters and the funds placement state

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};
use crate::math::{is_tick_valid, safe_add_i64, safe_mul_i64, Tick};

/// Where the pooled assets live
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundsState {
    /// All assets idle in vault custody, no market exposure
    #[default]
    Vault,
    /// Assets swept into the market-making reserve, no resting ladder
    Passive,
    /// Assets in the reserve and the ladder posted
    Active,
}

/// Geometric ladder configuration set by the manager
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Tick of rung 0 (base/quote orientation)
    pub tick_index0: Tick,
    /// Tick distance between adjacent rungs
    pub tick_offset: u32,
    /// Rungs to jump when reposting a consumed offer on the other side
    pub step_size: u32,
    /// Ladder length
    pub price_points: u32,
    /// Venue execution gas hint, passed through
    #[serde(default)]
    pub gas_hint: u32,
    /// Venue gas price hint, passed through
    #[serde(default)]
    pub gas_price_hint: u32,
    pub funds_state: FundsState,
}

impl Position {
    /// Base/quote tick of rung `index`
    pub fn rung_tick(&self, index: u32) -> VaultResult<Tick> {
        let offset = safe_mul_i64(index as i64, self.tick_offset as i64)?;
        let tick = safe_add_i64(self.tick_index0 as i64, offset)?;
        let tick = Tick::try_from(tick).map_err(|_| VaultError::MathOverflow)?;
        if !is_tick_valid(tick) {
            return Err(VaultError::InvalidTick(tick));
        }
        Ok(tick)
    }

    /// Ladder shape checks; only an active position needs a postable ladder
    pub fn validate(&self) -> VaultResult<()> {
        if self.funds_state != FundsState::Active {
            return Ok(());
        }
        if self.price_points < 2 {
            return Err(VaultError::InvalidPosition("price_points must be at least 2"));
        }
        if self.step_size == 0 || self.step_size >= self.price_points {
            return Err(VaultError::InvalidPosition(
                "step_size must be in [1, price_points)",
            ));
        }
        if self.tick_offset == 0 {
            return Err(VaultError::InvalidPosition("tick_offset must be positive"));
        }
        // Rung ticks are monotonic, checking both ends covers the ladder
        self.rung_tick(0)?;
        self.rung_tick(self.price_points - 1)?;
        Ok(())
    }
}
