use num_bigint::BigInt;
use num_traits::Signed;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::price_tick::{price_to_tick, MAX_TICK, MIN_TICK};

/// ZeroForOne sells token0 for token1 (price falls); OneForZero the reverse.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwapDirection { ZeroForOne, OneForZero }

impl SwapDirection {
    #[inline]
    pub fn is_zero_for_one(self) -> bool { matches!(self, SwapDirection::ZeroForOne) }
}

/// An initialized tick.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub index: i32,
    /// Change in active liquidity when price crosses this tick ascending.
    pub liquidity_net: BigInt,
    /// Total liquidity referencing this tick, bookkeeping only.
    pub liquidity_gross: BigInt,
}

/// Liquidity `L` provided over `[lower_tick, upper_tick)`. Immutable once built.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    lower_tick: i32,
    upper_tick: i32,
    liquidity: BigInt,
}

impl Position {
    pub fn new(lower_tick: i32, upper_tick: i32, liquidity: BigInt) -> Result<Self, MathError> {
        if lower_tick >= upper_tick {
            return Err(MathError::range(lower_tick, upper_tick));
        }
        for t in [lower_tick, upper_tick] {
            if !(MIN_TICK..=MAX_TICK).contains(&t) {
                return Err(MathError::TickOutOfRange(t as i64));
            }
        }
        if liquidity.is_negative() {
            return Err(MathError::NonPositiveLiquidity);
        }
        Ok(Self { lower_tick, upper_tick, liquidity })
    }

    /// Position over a human price range; bounds snap down to their ticks.
    pub fn from_prices(lower_price: f64, upper_price: f64, liquidity: BigInt) -> Result<Self, MathError> {
        Self::new(price_to_tick(lower_price)?, price_to_tick(upper_price)?, liquidity)
    }

    pub fn lower_tick(&self) -> i32 { self.lower_tick }
    pub fn upper_tick(&self) -> i32 { self.upper_tick }
    pub fn liquidity(&self) -> &BigInt { &self.liquidity }

    /// Whether the position is active at `tick`.
    pub fn contains(&self, tick: i32) -> bool {
        self.lower_tick <= tick && tick < self.upper_tick
    }
}

/// Mutable part of a pool. `active_liquidity` always equals the sum of
/// `liquidity_net` over ticks at or below `current_tick`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub current_tick: i32,
    pub sqrt_price_x96: BigInt,
    pub active_liquidity: BigInt,
}

/// One iteration of the swap loop.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapStepResult {
    /// Gross input consumed, fee included.
    pub amount_in: BigInt,
    pub fee_amount: BigInt,
    pub amount_out: BigInt,
    pub sqrt_price_before_x96: BigInt,
    pub sqrt_price_after_x96: BigInt,
    /// Active liquidity the step traded against.
    pub liquidity: BigInt,
    pub crossed_tick: bool,
    pub tick_crossed: Option<i32>,
}

/// How a swap ended.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwapStatus {
    /// All input consumed.
    Exhausted,
    /// Ran out of liquidity (or price range) with input left over. Partial, not an error.
    Starved,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SwapResult {
    pub direction: SwapDirection,
    pub amount_in: BigInt,
    pub amount_out: BigInt,
    pub fees_collected: BigInt,
    pub amount_remaining: BigInt,
    pub initial_price: f64,
    pub final_price: f64,
    pub final_sqrt_price_x96: BigInt,
    /// (initial - final) / initial, sign follows the direction.
    pub price_impact: f64,
    pub status: SwapStatus,
    /// The last step ran with no initialized tick left in the swap direction.
    pub unbounded: bool,
    pub steps: Vec<SwapStepResult>,
}

impl SwapResult {
    pub fn ticks_crossed(&self) -> usize {
        self.steps.iter().filter(|s| s.crossed_tick).count()
    }

    pub fn is_complete(&self) -> bool { self.status == SwapStatus::Exhausted }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_requires_ordered_in_range_ticks() {
        assert!(Position::new(-10, 10, BigInt::from(5)).is_ok());
        assert!(matches!(Position::new(10, 10, BigInt::from(5)), Err(MathError::InvalidRange { .. })));
        assert!(matches!(Position::new(10, -10, BigInt::from(5)), Err(MathError::InvalidRange { .. })));
        assert_eq!(Position::new(-10, MAX_TICK + 1, BigInt::from(5)), Err(MathError::TickOutOfRange(887_273)));
        assert_eq!(Position::new(-10, 10, BigInt::from(-1)), Err(MathError::NonPositiveLiquidity));
    }

    #[test]
    fn position_from_prices_snaps_to_ticks() {
        let p = Position::from_prices(1900.0, 2100.0, BigInt::from(1)).unwrap();
        assert_eq!(p.lower_tick(), price_to_tick(1900.0).unwrap());
        assert_eq!(p.upper_tick(), price_to_tick(2100.0).unwrap());
        assert!(p.contains(price_to_tick(2000.0).unwrap()));
        assert!(!p.contains(p.upper_tick()));
        assert!(Position::from_prices(2100.0, 1900.0, BigInt::from(1)).is_err());
    }
}
