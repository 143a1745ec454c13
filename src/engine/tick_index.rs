// Ordered tick -> net liquidity index.
//
// Positions write +L at their lower tick and -L at their upper tick, so the
// running sum of liquidity_net up to a tick is the liquidity active there.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_traits::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::price_tick::{tick_to_price, MAX_TICK, MIN_TICK};
use crate::models::{Position, SwapDirection, Tick};

/// Which way to search from a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction { Ascending, Descending }

impl From<SwapDirection> for Direction {
    fn from(d: SwapDirection) -> Self {
        match d {
            SwapDirection::ZeroForOne => Direction::Descending,
            SwapDirection::OneForZero => Direction::Ascending,
        }
    }
}

/// Read-only view of one initialized tick for reporting layers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LiquidityBand {
    pub tick: i32,
    pub price: f64,
    pub liquidity_net: BigInt,
    pub liquidity_gross: BigInt,
    /// Active liquidity from this tick up to the next initialized one.
    pub active_liquidity: BigInt,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickLiquidityIndex {
    ticks: BTreeMap<i32, Tick>,
}

impl TickLiquidityIndex {
    pub fn new() -> Self { Self::default() }

    pub fn from_positions(positions: &[Position]) -> Self {
        let mut index = Self::new();
        for p in positions {
            index.add_position(p);
        }
        index
    }

    /// Record a position: `(lower, +L, L)` and `(upper, -L, L)`.
    pub fn add_position(&mut self, position: &Position) {
        let l = position.liquidity();
        // Position ticks are validated on construction
        self.merge(position.lower_tick(), l.clone(), l.clone());
        self.merge(position.upper_tick(), -l.clone(), l.clone());
    }

    /// Merge a tick entry, summing both fields with any existing entry at `index`.
    pub fn add_tick(&mut self, index: i32, liquidity_net: BigInt, liquidity_gross: BigInt) -> Result<(), MathError> {
        if !(MIN_TICK..=MAX_TICK).contains(&index) {
            return Err(MathError::TickOutOfRange(index as i64));
        }
        self.merge(index, liquidity_net, liquidity_gross);
        Ok(())
    }

    fn merge(&mut self, index: i32, liquidity_net: BigInt, liquidity_gross: BigInt) {
        let entry = self.ticks.entry(index).or_insert_with(|| Tick {
            index,
            liquidity_net: BigInt::zero(),
            liquidity_gross: BigInt::zero(),
        });
        entry.liquidity_net += liquidity_net;
        entry.liquidity_gross += liquidity_gross;
    }

    /// Sum of `liquidity_net` over every tick with `index <= tick`.
    pub fn active_liquidity_at(&self, tick: i32) -> BigInt {
        self.ticks.range(..=tick).map(|(_, t)| &t.liquidity_net).sum()
    }

    /// Nearest tick strictly beyond `current` in `direction`.
    pub fn next_tick(&self, current: i32, direction: Direction) -> Option<&Tick> {
        match direction {
            Direction::Ascending => current
                .checked_add(1)
                .and_then(|from| self.ticks.range(from..).next()),
            Direction::Descending => self.ticks.range(..current).next_back(),
        }
        .map(|(_, t)| t)
    }

    pub fn get(&self, index: i32) -> Option<&Tick> { self.ticks.get(&index) }

    pub fn len(&self) -> usize { self.ticks.len() }

    /// Zero for any index built purely from positions.
    pub fn net_liquidity_sum(&self) -> BigInt {
        self.ticks.values().map(|t| &t.liquidity_net).sum()
    }

    pub fn snapshot(&self) -> Vec<LiquidityBand> {
        let mut running = BigInt::zero();
        self.ticks
            .values()
            .map(|t| {
                running += &t.liquidity_net;
                LiquidityBand {
                    tick: t.index,
                    price: tick_to_price(t.index).unwrap_or_default(),
                    liquidity_net: t.liquidity_net.clone(),
                    liquidity_gross: t.liquidity_gross.clone(),
                    active_liquidity: running.clone(),
                }
            })
            .collect()
    }
}
