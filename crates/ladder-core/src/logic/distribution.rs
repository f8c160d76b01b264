//! Geometric ladder planning
//!
//! Rung `i` sits at base/quote tick `tick_index0 + i * tick_offset`. Rungs at or
//! above the oracle tick carry asks (selling base), rungs below carry bids
//! (buying base with quote). A gap of roughly `step_size` rungs is left around
//! the mid so that a filled offer always has a free slot `step_size` rungs away
//! on the other side to be reposted into.
//!
//! Every live offer is paired with a zero-volume dual on the opposite side. The
//! venue reposts filled volume into that dual, which is why both arrays carry
//! the same number of entries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VaultResult;
use crate::math::Tick;
use crate::state::Position;

/// Direction of an offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferSide {
    Bid,
    Ask,
}

/// A single rung offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionOffer {
    /// Rung index in `[0, price_points)`
    pub index: u32,
    /// Venue tick: base/quote for asks, quote/base (negated) for bids
    pub tick: Tick,
    /// Volume offered; quote for bids, base for asks. Zero for duals.
    pub gives: u128,
}

impl DistributionOffer {
    /// Tick in base/quote orientation regardless of side
    pub fn price_tick(&self, side: OfferSide) -> Tick {
        match side {
            OfferSide::Bid => -self.tick,
            OfferSide::Ask => self.tick,
        }
    }

    pub fn is_live(&self) -> bool {
        self.gives > 0
    }
}

/// Paired bid and ask offers for one ladder
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub bids: Vec<DistributionOffer>,
    pub asks: Vec<DistributionOffer>,
}

impl Distribution {
    pub fn live_bids(&self) -> impl Iterator<Item = &DistributionOffer> {
        self.bids.iter().filter(|offer| offer.is_live())
    }

    pub fn live_asks(&self) -> impl Iterator<Item = &DistributionOffer> {
        self.asks.iter().filter(|offer| offer.is_live())
    }

    pub fn total_bid_gives(&self) -> u128 {
        self.live_bids().fold(0u128, |acc, offer| acc.saturating_add(offer.gives))
    }

    pub fn total_ask_gives(&self) -> u128 {
        self.live_asks().fold(0u128, |acc, offer| acc.saturating_add(offer.gives))
    }
}

/// Ladder plan plus the sizing that produced it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedDistribution {
    pub distribution: Distribution,
    pub first_ask_index: u32,
    pub live_bids: u32,
    pub live_asks: u32,
    /// Per-rung bid volume in quote
    pub bid_gives: u128,
    /// Per-rung ask volume in base
    pub ask_gives: u128,
    /// Both sides populated and every live offer above the venue minimum
    pub valid: bool,
}

/// First rung whose tick is at or above `mid_tick`; `price_points` if none is
pub fn first_ask_index(position: &Position, mid_tick: Tick) -> VaultResult<u32> {
    for index in 0..position.price_points {
        if position.rung_tick(index)? >= mid_tick {
            return Ok(index);
        }
    }
    Ok(position.price_points)
}

/// Rung a filled offer at `index` reposts into, clamped to the ladder
pub fn transport_destination(side: OfferSide, index: u32, step_size: u32, price_points: u32) -> u32 {
    match side {
        OfferSide::Bid => index
            .saturating_add(step_size)
            .min(price_points.saturating_sub(1)),
        OfferSide::Ask => index.saturating_sub(step_size),
    }
}

/// Live rung ranges `(bid_bound, ask_start)`: bids on `[0, bid_bound)`, asks on
/// `[ask_start, price_points)`
fn live_ranges(position: &Position, first_ask_index: u32) -> (u32, u32) {
    let step = position.step_size;
    let points = position.price_points;

    let bid_hole = step / 2 + step % 2;
    let bid_bound = first_ask_index
        .saturating_sub(bid_hole)
        .min(points.saturating_sub(step));

    let ask_start = first_ask_index
        .saturating_add(step / 2)
        .max(step)
        .min(points);

    (bid_bound, ask_start)
}

/// Build the paired offer arrays with uniform per-rung volumes
pub fn create_distribution(
    position: &Position,
    first_ask_index: u32,
    bid_gives: u128,
    ask_gives: u128,
) -> VaultResult<Distribution> {
    let (bid_bound, ask_start) = live_ranges(position, first_ask_index);
    let step = position.step_size;
    let points = position.price_points;

    let live_bid_count = bid_bound as usize;
    let live_ask_count = points.saturating_sub(ask_start) as usize;
    let pairs = live_bid_count + live_ask_count;

    let mut bids = Vec::with_capacity(pairs);
    let mut asks = Vec::with_capacity(pairs);

    for index in 0..bid_bound {
        let tick = position.rung_tick(index)?;
        bids.push(DistributionOffer {
            index,
            tick: -tick,
            gives: bid_gives,
        });
        let dual = transport_destination(OfferSide::Bid, index, step, points);
        asks.push(DistributionOffer {
            index: dual,
            tick: position.rung_tick(dual)?,
            gives: 0,
        });
    }

    for index in ask_start..points {
        let dual = transport_destination(OfferSide::Ask, index, step, points);
        bids.push(DistributionOffer {
            index: dual,
            tick: -position.rung_tick(dual)?,
            gives: 0,
        });
        asks.push(DistributionOffer {
            index,
            tick: position.rung_tick(index)?,
            gives: ask_gives,
        });
    }

    Ok(Distribution { bids, asks })
}

/// Plan a ladder around `mid_tick` that spreads the reserve evenly. The plan is
/// flagged invalid when either side ends up empty or under the venue minimum.
pub fn plan_distribution(
    position: &Position,
    mid_tick: Tick,
    reserve_base: u128,
    reserve_quote: u128,
    min_viable: (u128, u128),
) -> VaultResult<PlannedDistribution> {
    let (min_bid_gives, min_ask_gives) = min_viable;
    let first_ask = first_ask_index(position, mid_tick)?;
    let (bid_bound, ask_start) = live_ranges(position, first_ask);

    let live_bids = bid_bound;
    let live_asks = position.price_points.saturating_sub(ask_start);

    let bid_gives = if live_bids > 0 {
        reserve_quote / live_bids as u128
    } else {
        0
    };
    let ask_gives = if live_asks > 0 {
        reserve_base / live_asks as u128
    } else {
        0
    };

    let valid = live_bids > 0
        && live_asks > 0
        && bid_gives > 0
        && ask_gives > 0
        && bid_gives >= min_bid_gives
        && ask_gives >= min_ask_gives;

    let distribution = create_distribution(position, first_ask, bid_gives, ask_gives)?;

    debug!(
        mid_tick,
        first_ask,
        live_bids,
        live_asks,
        bid_gives,
        ask_gives,
        valid,
        "planned ladder"
    );

    Ok(PlannedDistribution {
        distribution,
        first_ask_index: first_ask,
        live_bids,
        live_asks,
        bid_gives,
        ask_gives,
        valid,
    })
}
