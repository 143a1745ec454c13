// Exact-input swap across initialized ticks.
//
// Each iteration trades inside one liquidity region: either the remaining
// input reaches the next initialized tick (cross it and go on) or it runs out
// before (last step). With no tick left in the swap direction the region is
// bounded by the representable sqrt-price range instead.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::pool::Pool;
use crate::engine::tick_index::Direction;
use crate::error::MathError;
use crate::math::price_tick::{max_sqrt_ratio, min_sqrt_ratio, sqrt_price_at_tick, sqrt_price_to_price, tick_at_sqrt_price};
use crate::math::swap_step::{amount_to_reach, compute_step_towards, step_to_boundary};
use crate::models::{PoolState, SwapDirection, SwapResult, SwapStatus, SwapStepResult};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    pub direction: SwapDirection,
    /// Exact input in raw units of the token being sold.
    pub amount_in: BigInt,
}

impl SwapParams {
    pub fn new(direction: SwapDirection, amount_in: BigInt) -> Self { Self { direction, amount_in } }
}

/// Outcome of a simulation plus the pool state it leads to.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapTransition {
    pub result: SwapResult,
    pub next_state: PoolState,
}

pub fn simulate_swap(pool: &Pool, params: &SwapParams) -> Result<SwapTransition, MathError> {
    if params.amount_in.is_negative() {
        return Err(MathError::NonPositiveAmount);
    }

    let direction = params.direction;
    let zero_for_one = direction.is_zero_for_one();
    let fee_ppm = pool.fee_ppm();
    let initial_sqrt = pool.state.sqrt_price_x96.clone();

    let mut amount_remaining = params.amount_in.clone();
    let mut sqrt_price = initial_sqrt.clone();
    let mut liquidity = pool.state.active_liquidity.clone();
    let mut current_tick = pool.state.current_tick;

    let mut amount_out = BigInt::zero();
    let mut fees_collected = BigInt::zero();
    let mut steps: Vec<SwapStepResult> = Vec::new();
    let mut unbounded = false;

    let status = loop {
        if amount_remaining.is_zero() {
            break SwapStatus::Exhausted;
        }
        if !liquidity.is_positive() {
            log::warn!(
                "no active liquidity at tick {}, {} of {} input left unswapped",
                current_tick, amount_remaining, params.amount_in
            );
            break SwapStatus::Starved;
        }

        // descending includes a tick sitting exactly at the current index
        let search_from = if zero_for_one { current_tick.saturating_add(1) } else { current_tick };
        let next = pool.ticks.next_tick(search_from, Direction::from(direction));
        unbounded = next.is_none();
        let target = match next {
            Some(t) => sqrt_price_at_tick(t.index)?,
            None if zero_for_one => min_sqrt_ratio(),
            None => max_sqrt_ratio(),
        };

        let (_, gross_to_target) = amount_to_reach(&sqrt_price, &target, &liquidity, fee_ppm, zero_for_one)?;
        let reaches_target = gross_to_target <= amount_remaining;
        let outcome = if reaches_target {
            step_to_boundary(&sqrt_price, &target, &liquidity, fee_ppm, zero_for_one)?
        } else {
            compute_step_towards(&amount_remaining, &sqrt_price, &target, &liquidity, fee_ppm, zero_for_one)?
        };

        let step_in = outcome.amount_in();
        amount_remaining -= &step_in;
        fees_collected += &outcome.fee_amount;
        amount_out += &outcome.amount_out;

        let mut step = SwapStepResult {
            amount_in: step_in,
            fee_amount: outcome.fee_amount.clone(),
            amount_out: outcome.amount_out.clone(),
            sqrt_price_before_x96: sqrt_price.clone(),
            sqrt_price_after_x96: outcome.sqrt_price_after_x96.clone(),
            liquidity: liquidity.clone(),
            crossed_tick: false,
            tick_crossed: None,
        };
        sqrt_price = outcome.sqrt_price_after_x96;

        match next {
            Some(tick) if reaches_target => {
                if zero_for_one {
                    liquidity -= &tick.liquidity_net;
                    current_tick = tick.index - 1;
                } else {
                    liquidity += &tick.liquidity_net;
                    current_tick = tick.index;
                }
                log::debug!("crossed tick {}, active liquidity now {}", tick.index, liquidity);
                step.crossed_tick = true;
                step.tick_crossed = Some(tick.index);
                steps.push(step);
            }
            None if reaches_target => {
                current_tick = tick_at_sqrt_price(&sqrt_price)?;
                steps.push(step);
                if amount_remaining.is_positive() {
                    log::warn!(
                        "price pinned at the sqrt-price range limit, {} input left unswapped",
                        amount_remaining
                    );
                    break SwapStatus::Starved;
                }
                break SwapStatus::Exhausted;
            }
            _ => {
                current_tick = tick_at_sqrt_price(&sqrt_price)?;
                log::debug!("step ended inside tick {} at sqrt price {}", current_tick, sqrt_price);
                steps.push(step);
            }
        }
    };

    let initial_price = sqrt_price_to_price(&initial_sqrt);
    let final_price = sqrt_price_to_price(&sqrt_price);
    let price_impact = if initial_price > 0.0 { (initial_price - final_price) / initial_price } else { 0.0 };
    let amount_in = &params.amount_in - &amount_remaining;

    log::info!(
        "swap {:?}: in={} out={} fees={} steps={} status={:?}",
        direction, amount_in, amount_out, fees_collected, steps.len(), status
    );

    Ok(SwapTransition {
        result: SwapResult {
            direction,
            amount_in,
            amount_out,
            fees_collected,
            amount_remaining,
            initial_price,
            final_price,
            final_sqrt_price_x96: sqrt_price.clone(),
            price_impact,
            status,
            unbounded,
            steps,
        },
        next_state: PoolState { current_tick, sqrt_price_x96: sqrt_price, active_liquidity: liquidity },
    })
}
