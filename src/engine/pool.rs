use num_bigint::BigInt;
use num_traits::Signed;

use crate::engine::simulator::{simulate_swap, SwapParams, SwapTransition};
use crate::engine::tick_index::TickLiquidityIndex;
use crate::error::MathError;
use crate::math::fees::FeeTier;
use crate::math::price_tick::{price_to_sqrt_price, sqrt_price_at_tick, sqrt_price_to_price, tick_at_sqrt_price};
use crate::models::{PoolState, Position, SwapResult};

/// A single concentrated-liquidity pool: fee tier, tick index and current state.
#[derive(Clone, Debug, PartialEq)]
pub struct Pool {
    pub fee_tier: FeeTier,
    pub state: PoolState,
    pub ticks: TickLiquidityIndex,
}

impl Pool {
    /// Pool at `sqrt_price_x96`; current tick and active liquidity are derived from the index.
    pub fn new(fee_tier: FeeTier, sqrt_price_x96: BigInt, ticks: TickLiquidityIndex) -> Result<Self, MathError> {
        let current_tick = tick_at_sqrt_price(&sqrt_price_x96)?;
        let active_liquidity = ticks.active_liquidity_at(current_tick);
        if active_liquidity.is_negative() {
            return Err(MathError::NonPositiveLiquidity);
        }
        Ok(Self {
            fee_tier,
            state: PoolState { current_tick, sqrt_price_x96, active_liquidity },
            ticks,
        })
    }

    pub fn from_positions(price: f64, fee_tier: FeeTier, positions: &[Position]) -> Result<Self, MathError> {
        Self::new(fee_tier, price_to_sqrt_price(price)?, TickLiquidityIndex::from_positions(positions))
    }

    /// Pool priced exactly on a tick boundary.
    pub fn at_tick(tick: i32, fee_tier: FeeTier, positions: &[Position]) -> Result<Self, MathError> {
        Self::new(fee_tier, sqrt_price_at_tick(tick)?, TickLiquidityIndex::from_positions(positions))
    }

    pub fn price(&self) -> f64 { sqrt_price_to_price(&self.state.sqrt_price_x96) }

    pub fn fee_ppm(&self) -> u32 { self.fee_tier.fee_ppm() }

    /// Simulate without touching the pool.
    pub fn simulate(&self, params: &SwapParams) -> Result<SwapTransition, MathError> {
        simulate_swap(self, params)
    }

    /// Simulate and move the pool to the resulting state.
    pub fn swap(&mut self, params: &SwapParams) -> Result<SwapResult, MathError> {
        let SwapTransition { result, next_state } = simulate_swap(self, params)?;
        self.state = next_state;
        Ok(result)
    }
}
