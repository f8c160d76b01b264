//! Event definitions

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::math::Tick;
use crate::state::{FeeData, FundsState};
use crate::types::Address;

/// Event emitted when shares are minted against a deposit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minted {
    pub user: Address,
    pub shares: u128,
    pub base_amount: u128,
    pub quote_amount: u128,
    pub tick: Tick,
    pub timestamp: u64,
}

/// Event emitted when shares are burned for a withdrawal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burned {
    pub user: Address,
    pub shares: u128,
    pub base_amount: u128,
    pub quote_amount: u128,
    pub tick: Tick,
    pub timestamp: u64,
}

/// Event emitted when fee shares are minted to the recipient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeesAccrued {
    pub recipient: Address,
    pub fee_shares: u128,
    pub fee_value_in_quote: u128,
    pub value_in_quote: u128,
    pub timestamp: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointUpdated {
    pub value_in_quote: u128,
    pub high_water_mark: u128,
    pub timestamp: u64,
}

/// Event emitted after every market-making placement pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdated {
    pub funds_state: FundsState,
    pub tick: Tick,
    pub outcome: PositionOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderPosted {
    pub first_ask_index: u32,
    pub live_bids: u32,
    pub live_asks: u32,
    pub bid_gives: u128,
    pub ask_gives: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderRetracted {
    pub reason: String,
}

/// Event emitted when a manager swap rebalances the pool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swapped {
    pub executor: Address,
    /// True when base was sold for quote
    pub sell: bool,
    pub amount_out: u128,
    pub amount_in: u128,
    pub timestamp: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDataUpdated {
    pub fee_data: FeeData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxTotalInQuoteUpdated {
    pub max_total_in_quote: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapContractUpdated {
    pub executor: Address,
    pub allowed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWithdrawn {
    pub asset: Address,
    pub to: Address,
    pub amount: u128,
}

/// How a placement pass ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionOutcome {
    /// Ladder live on the venue
    Posted,
    /// Funds in the reserve, no ladder (passive, or an active plan that could not be posted)
    Retracted,
    /// All funds back in vault custody
    Withdrawn,
    /// A collaborator failed mid-pass; funds stay wherever they ended up
    Degraded { reason: String },
}

/// Everything the vault reports, in emission order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    Minted(Minted),
    Burned(Burned),
    FeesAccrued(FeesAccrued),
    CheckpointUpdated(CheckpointUpdated),
    PositionUpdated(PositionUpdated),
    LadderPosted(LadderPosted),
    LadderRetracted(LadderRetracted),
    Swapped(Swapped),
    FeeDataUpdated(FeeDataUpdated),
    MaxTotalInQuoteUpdated(MaxTotalInQuoteUpdated),
    SwapContractUpdated(SwapContractUpdated),
    TokenWithdrawn(TokenWithdrawn),
}

impl VaultEvent {
    pub fn name(&self) -> &'static str {
        match self {
            VaultEvent::Minted(_) => "minted",
            VaultEvent::Burned(_) => "burned",
            VaultEvent::FeesAccrued(_) => "fees_accrued",
            VaultEvent::CheckpointUpdated(_) => "checkpoint_updated",
            VaultEvent::PositionUpdated(_) => "position_updated",
            VaultEvent::LadderPosted(_) => "ladder_posted",
            VaultEvent::LadderRetracted(_) => "ladder_retracted",
            VaultEvent::Swapped(_) => "swapped",
            VaultEvent::FeeDataUpdated(_) => "fee_data_updated",
            VaultEvent::MaxTotalInQuoteUpdated(_) => "max_total_in_quote_updated",
            VaultEvent::SwapContractUpdated(_) => "swap_contract_updated",
            VaultEvent::TokenWithdrawn(_) => "token_withdrawn",
        }
    }

    /// JSON rendering used for log lines and external sinks
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"event\":\"{}\"}}", self.name()))
    }
}

/// Buffer of events produced by one operation; flushed only if it succeeds
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<VaultEvent>,
}

impl EventBuffer {
    pub fn emit(&mut self, event: impl Into<VaultEvent>) {
        self.events.push(event.into());
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Move buffered events into `log`, mirroring each one to tracing
    pub fn flush_into(self, log: &mut Vec<VaultEvent>) {
        for event in self.events {
            info!(event = event.name(), payload = %event.to_json(), "vault event");
            log.push(event);
        }
    }
}

macro_rules! impl_into_event {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for VaultEvent {
                fn from(event: $variant) -> Self {
                    VaultEvent::$variant(event)
                }
            }
        )*
    };
}

impl_into_event!(
    Minted,
    Burned,
    FeesAccrued,
    CheckpointUpdated,
    PositionUpdated,
    LadderPosted,
    LadderRetracted,
    Swapped,
    FeeDataUpdated,
    MaxTotalInQuoteUpdated,
    SwapContractUpdated,
    TokenWithdrawn,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = VaultEvent::from(MaxTotalInQuoteUpdated {
            max_total_in_quote: 42,
        });
        let json: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(json["event"], "max_total_in_quote_updated");
        assert_eq!(json["max_total_in_quote"], 42);
    }

    #[test]
    fn test_buffer_flushes_in_order() {
        let mut buffer = EventBuffer::default();
        buffer.emit(LadderRetracted {
            reason: "passive".to_string(),
        });
        buffer.emit(SwapContractUpdated {
            executor: Address::repeat_byte(5),
            allowed: true,
        });

        let mut log = Vec::new();
        buffer.flush_into(&mut log);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].name(), "ladder_retracted");
        assert_eq!(log[1].name(), "swap_contract_updated");
    }
}
