// Quoting on top of the simulator: prices, exact-output search, pool picking.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::engine::pool::Pool;
use crate::engine::simulator::{simulate_swap, SwapParams, SwapTransition};
use crate::error::MathError;
use crate::models::{SwapDirection, SwapResult, SwapStatus};

/// Current pool price, token1 per token0.
pub fn spot_price(pool: &Pool) -> f64 { pool.price() }

/// Raw output per raw input of a simulated swap, 0.0 when nothing was swapped.
pub fn execution_price(result: &SwapResult) -> f64 {
    let input = result.amount_in.to_f64().unwrap_or(0.0);
    let output = result.amount_out.to_f64().unwrap_or(0.0);
    if input <= 0.0 { 0.0 } else { output / input }
}

/// Smallest exact input that yields at least `amount_out`.
///
/// `Ok(None)` when the pool runs out of liquidity before producing that much.
pub fn quote_exact_output(
    pool: &Pool,
    direction: SwapDirection,
    amount_out: &BigInt,
) -> Result<Option<BigInt>, MathError> {
    if amount_out.is_negative() {
        return Err(MathError::NonPositiveAmount);
    }
    if amount_out.is_zero() {
        return Ok(Some(BigInt::zero()));
    }

    let out_for = |amount_in: &BigInt| -> Result<SwapResult, MathError> {
        simulate_swap(pool, &SwapParams::new(direction, amount_in.clone())).map(|t| t.result)
    };

    // grow an upper bound until it fills the order
    let mut lo = BigInt::zero();
    let mut hi = BigInt::one();
    loop {
        let r = out_for(&hi)?;
        if r.amount_out >= *amount_out {
            break;
        }
        if r.status == SwapStatus::Starved {
            log::debug!("cannot fill {} out: pool drained at {} out", amount_out, r.amount_out);
            return Ok(None);
        }
        lo = hi.clone();
        hi <<= 1;
    }

    // invariant: out(lo) < amount_out <= out(hi)
    while &hi - &lo > BigInt::one() {
        let mid: BigInt = (&lo + &hi) >> 1;
        if out_for(&mid)?.amount_out >= *amount_out { hi = mid; } else { lo = mid; }
    }
    Ok(Some(hi))
}

/// Index and simulation of the candidate pool giving the most output for `params`.
pub fn best_pool_for_exact_in(
    pools: &[Pool],
    params: &SwapParams,
) -> Result<Option<(usize, SwapTransition)>, MathError> {
    let mut best: Option<(usize, SwapTransition)> = None;
    for (i, pool) in pools.iter().enumerate() {
        let sim = simulate_swap(pool, params)?;
        match &best {
            Some((_, b)) if sim.result.amount_out <= b.result.amount_out => {}
            _ => best = Some((i, sim)),
        }
    }
    Ok(best)
}
