// Request-level orchestration: human units in, simulations and reports out.

use anyhow::{Context, Result};
use num_bigint::BigInt;
use rust_decimal::Decimal;

use crate::bootstrap::SimulationDefaults;
use crate::engine::pool::Pool;
use crate::engine::quote::{execution_price, spot_price};
use crate::engine::simulator::SwapParams;
use crate::engine::tick_index::LiquidityBand;
use crate::error::MathError;
use crate::math::fees::{fees_earned, FeeTier};
use crate::math::liquidity::{amounts_for_position, liquidity_for_position};
use crate::math::price_tick::{price_to_sqrt_price, price_to_tick};
use crate::math::units::{from_raw, to_raw};
use crate::models::{PoolState, Position, SwapDirection, SwapResult};

/// A liquidity position in human units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionInput {
    pub lower_price: f64,
    pub upper_price: f64,
    pub liquidity: f64,
}

pub struct SwapAnalysis {
    pub timestamp_utc: String,
    pub fee_tier: FeeTier,
    pub decimals: u8,
    pub spot_price_before: f64,
    pub spot_price_after: f64,
    pub execution_price: f64,
    pub result: SwapResult,
    pub next_state: PoolState,
    pub liquidity_bands: Vec<LiquidityBand>,
}

impl SwapAnalysis {
    pub fn human(&self, raw: &BigInt) -> f64 { from_raw(raw, self.decimals) }
}

pub struct PositionSizing {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub liquidity: BigInt,
    pub amount0_used: BigInt,
    pub amount1_used: BigInt,
}

fn resolve_fee_tier(defaults: &SimulationDefaults, fee_ppm: Option<u32>) -> Result<FeeTier> {
    match fee_ppm {
        Some(ppm) => FeeTier::try_from(ppm).with_context(|| format!("fee {} ppm is not a pool tier", ppm)),
        None => Ok(defaults.fee_tier),
    }
}

fn checked_amount(amount: f64, decimals: u8) -> Result<BigInt, MathError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(MathError::NonPositiveAmount);
    }
    Ok(to_raw(amount, decimals))
}

pub fn build_pool(
    defaults: &SimulationDefaults,
    price: f64,
    fee_ppm: Option<u32>,
    positions: &[PositionInput],
) -> Result<Pool> {
    let fee_tier = resolve_fee_tier(defaults, fee_ppm)?;
    let positions = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let liquidity = checked_amount(p.liquidity, defaults.token_decimals)?;
            Position::from_prices(p.lower_price, p.upper_price, liquidity)
                .with_context(|| format!("position #{} [{}, {}]", i, p.lower_price, p.upper_price))
        })
        .collect::<Result<Vec<_>>>()?;

    Pool::from_positions(price, fee_tier, &positions).with_context(|| format!("pool at price {}", price))
}

pub fn analyze_swap(
    defaults: &SimulationDefaults,
    pool: &Pool,
    direction: SwapDirection,
    amount_in: f64,
) -> Result<SwapAnalysis> {
    let amount_in = checked_amount(amount_in, defaults.token_decimals).context("amount_in")?;
    let transition = pool.simulate(&SwapParams::new(direction, amount_in))?;

    let mut after = pool.clone();
    after.state = transition.next_state.clone();

    Ok(SwapAnalysis {
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        fee_tier: pool.fee_tier,
        decimals: defaults.token_decimals,
        spot_price_before: spot_price(pool),
        spot_price_after: spot_price(&after),
        execution_price: execution_price(&transition.result),
        result: transition.result,
        next_state: transition.next_state,
        liquidity_bands: pool.ticks.snapshot(),
    })
}

/// Liquidity a deposit of `amount0`/`amount1` buys over `[lower_price, upper_price]`
/// at `price`, and the amounts that liquidity actually commits.
pub fn size_position(
    defaults: &SimulationDefaults,
    price: f64,
    lower_price: f64,
    upper_price: f64,
    amount0: f64,
    amount1: f64,
) -> Result<PositionSizing> {
    let sqrt_price = price_to_sqrt_price(price)?;
    let lower_tick = price_to_tick(lower_price).context("lower_price")?;
    let upper_tick = price_to_tick(upper_price).context("upper_price")?;
    let a0 = checked_amount(amount0, defaults.token_decimals).context("amount0")?;
    let a1 = checked_amount(amount1, defaults.token_decimals).context("amount1")?;

    let liquidity = liquidity_for_position(&sqrt_price, lower_tick, upper_tick, &a0, &a1)?;
    let (amount0_used, amount1_used) = amounts_for_position(&sqrt_price, lower_tick, upper_tick, &liquidity)?;
    Ok(PositionSizing { lower_tick, upper_tick, liquidity, amount0_used, amount1_used })
}

pub fn estimate_fees(
    defaults: &SimulationDefaults,
    my_liquidity: f64,
    total_liquidity: f64,
    pool_volume_usd: f64,
    fee_ppm: Option<u32>,
) -> Result<Decimal> {
    let fee_tier = resolve_fee_tier(defaults, fee_ppm)?;
    let mine = checked_amount(my_liquidity, defaults.token_decimals).context("my_liquidity")?;
    let total = checked_amount(total_liquidity, defaults.token_decimals).context("total_liquidity")?;
    let volume = Decimal::try_from(pool_volume_usd)
        .with_context(|| format!("pool_volume_usd {} is not a decimal amount", pool_volume_usd))?;

    Ok(fees_earned(&mine, volume, &total, fee_tier.rate())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwapStatus;

    fn defaults() -> SimulationDefaults {
        SimulationDefaults { fee_tier: FeeTier::Medium, token_decimals: 18 }
    }

    fn range(lower: f64, upper: f64, liquidity: f64) -> PositionInput {
        PositionInput { lower_price: lower, upper_price: upper, liquidity }
    }

    #[test]
    fn analyze_swap_reports_prices() {
        let d = defaults();
        let pool = build_pool(&d, 2000.0, None, &[range(1900.0, 2100.0, 100_000.0)]).unwrap();
        let a = analyze_swap(&d, &pool, SwapDirection::ZeroForOne, 1.0).unwrap();

        assert_eq!(a.fee_tier, FeeTier::Medium);
        assert_eq!(a.result.status, SwapStatus::Exhausted);
        assert!(a.spot_price_after < a.spot_price_before);
        assert!(a.execution_price > 1990.0 && a.execution_price < 2000.0);
        assert_eq!(a.liquidity_bands.len(), 2);
        assert!((a.human(&a.result.fees_collected) - 0.003).abs() < 1e-9);
    }

    #[test]
    fn bad_inputs_carry_context() {
        let d = defaults();
        let err = build_pool(&d, 2000.0, Some(2_500), &[]).unwrap_err();
        assert!(format!("{:#}", err).contains("2500"));

        let err = build_pool(&d, 2000.0, None, &[range(2100.0, 1900.0, 1.0)]).unwrap_err();
        assert!(format!("{:#}", err).contains("position #0"));

        let pool = build_pool(&d, 2000.0, None, &[range(1900.0, 2100.0, 1.0)]).unwrap();
        assert!(analyze_swap(&d, &pool, SwapDirection::OneForZero, -1.0).is_err());
    }

    #[test]
    fn sizing_never_commits_more_than_deposited() {
        let s = size_position(&defaults(), 2000.0, 1900.0, 2100.0, 10.0, 15_000.0).unwrap();
        assert!(s.lower_tick < s.upper_tick);
        assert!(s.amount0_used <= to_raw(10.0, 18));
        assert!(s.amount1_used <= to_raw(15_000.0, 18));
        assert!(size_position(&defaults(), 2000.0, 2100.0, 1900.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn fee_estimate_uses_tier_rate() {
        let fees = estimate_fees(&defaults(), 25.0, 100.0, 1_000_000.0, None).unwrap();
        assert_eq!(fees, Decimal::from(750));
        let low = estimate_fees(&defaults(), 25.0, 100.0, 1_000_000.0, Some(500)).unwrap();
        assert_eq!(low, Decimal::from(125));
        assert!(estimate_fees(&defaults(), 1.0, 0.0, 10.0, None).is_err());
    }
}
