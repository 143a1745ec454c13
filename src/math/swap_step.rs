// Single-region swap step math (constant liquidity, no tick crossing).
// --------------------------------------------------------------------
// Exact-input only. Fee is taken off the gross input first, the net input
// moves the sqrt price along the constant-liquidity curve:
//   zero_for_one: 1/sqrtQ = 1/sqrtP + in/L      (price falls)
//   one_for_zero:   sqrtQ =   sqrtP + in/L      (price rises)
// Amounts owed to the pool round up, amounts paid out round down.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::error::MathError;
use crate::math::fees::FEE_DENOMINATOR_PPM;
use crate::math::liquidity::{amount0_delta, amount1_delta};
use crate::math::{ceil_div, q96};

/// What one step consumed and produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub sqrt_price_after_x96: BigInt,
    /// Input that actually moved the price.
    pub amount_in_net: BigInt,
    /// Gross input minus net input.
    pub fee_amount: BigInt,
    pub amount_out: BigInt,
}

impl StepOutcome {
    /// Gross input consumed (net + fee).
    pub fn amount_in(&self) -> BigInt { &self.amount_in_net + &self.fee_amount }
}

#[inline]
fn check_fee(fee_ppm: u32) -> Result<(), MathError> {
    if fee_ppm >= FEE_DENOMINATOR_PPM { Err(MathError::UnsupportedFeeTier(fee_ppm)) } else { Ok(()) }
}

/// Sqrt price after `amount_in_net` of the input token enters at constant liquidity.
///
/// Token0 in moves `1/sqrt` up by `amount/L`; the result rounds up so the price
/// falls no further than the input pays for. Token1 in moves `sqrt` up by
/// `amount/L`, rounded down.
fn sqrt_price_after_input(
    sqrt_price_x96: &BigInt,
    liquidity: &BigInt,
    amount_in_net: &BigInt,
    zero_for_one: bool,
) -> BigInt {
    if amount_in_net.is_zero() || liquidity.is_zero() {
        return sqrt_price_x96.clone();
    }
    if zero_for_one {
        let l_shifted = liquidity << 96;
        let reserve = &l_shifted * sqrt_price_x96;
        ceil_div(&reserve, &(l_shifted + amount_in_net * sqrt_price_x96))
    } else {
        sqrt_price_x96 + amount_in_net * q96() / liquidity
    }
}

/// Input owed to the pool for a price move from `from` to `to`, and output paid out.
fn in_out_between(from: &BigInt, to: &BigInt, liquidity: &BigInt, zero_for_one: bool) -> (BigInt, BigInt) {
    if zero_for_one {
        (amount0_delta(to, from, liquidity, true), amount1_delta(to, from, liquidity, false))
    } else {
        (amount1_delta(from, to, liquidity, true), amount0_delta(from, to, liquidity, false))
    }
}

/// Swap all of `amount_in` inside one liquidity region.
///
/// The caller is responsible for making sure the move does not cross an
/// initialized tick; see [`compute_step_towards`] for the bounded form.
pub fn compute_step(
    amount_in: &BigInt,
    sqrt_price_x96: &BigInt,
    liquidity: &BigInt,
    fee_ppm: u32,
    zero_for_one: bool,
) -> Result<StepOutcome, MathError> {
    if !liquidity.is_positive() {
        return Err(MathError::NonPositiveLiquidity);
    }
    if !amount_in.is_positive() {
        return Err(MathError::NonPositiveAmount);
    }
    check_fee(fee_ppm)?;

    let denom = BigInt::from(FEE_DENOMINATOR_PPM);
    let amount_in_less_fee = (amount_in * (&denom - fee_ppm)) / &denom;

    let sqrt_q = sqrt_price_after_input(sqrt_price_x96, liquidity, &amount_in_less_fee, zero_for_one);
    let (amount_in_net, amount_out) = in_out_between(sqrt_price_x96, &sqrt_q, liquidity, zero_for_one);

    // the whole input is spent: rounding dust beyond the net amount goes to fees
    Ok(StepOutcome {
        sqrt_price_after_x96: sqrt_q,
        fee_amount: amount_in - &amount_in_net,
        amount_in_net,
        amount_out,
    })
}

/// Net and gross input needed to move the price exactly to `target_x96`.
///
/// Inverts the step formula: net is the rounded-up token delta, gross grosses
/// it up by the fee, `ceil(net * 1e6 / (1e6 - fee))`.
pub fn amount_to_reach(
    sqrt_price_x96: &BigInt,
    target_x96: &BigInt,
    liquidity: &BigInt,
    fee_ppm: u32,
    zero_for_one: bool,
) -> Result<(BigInt, BigInt), MathError> {
    if !liquidity.is_positive() {
        return Err(MathError::NonPositiveLiquidity);
    }
    check_fee(fee_ppm)?;
    let wrong_side = if zero_for_one { target_x96 > sqrt_price_x96 } else { target_x96 < sqrt_price_x96 };
    if wrong_side {
        return Err(MathError::range(target_x96, sqrt_price_x96));
    }

    let (net, _) = in_out_between(sqrt_price_x96, target_x96, liquidity, zero_for_one);
    let denom = BigInt::from(FEE_DENOMINATOR_PPM);
    let gross = ceil_div(&(&net * &denom), &(&denom - fee_ppm));
    Ok((net, gross))
}

/// Move the price exactly to `target_x96`, paying the input from [`amount_to_reach`].
pub fn step_to_boundary(
    sqrt_price_x96: &BigInt,
    target_x96: &BigInt,
    liquidity: &BigInt,
    fee_ppm: u32,
    zero_for_one: bool,
) -> Result<StepOutcome, MathError> {
    let (net, gross) = amount_to_reach(sqrt_price_x96, target_x96, liquidity, fee_ppm, zero_for_one)?;
    let (_, amount_out) = in_out_between(sqrt_price_x96, target_x96, liquidity, zero_for_one);
    Ok(StepOutcome {
        sqrt_price_after_x96: target_x96.clone(),
        fee_amount: gross - &net,
        amount_in_net: net,
        amount_out,
    })
}

/// [`compute_step`] for an input the caller already knows cannot pay for
/// reaching `target_x96`.
///
/// Rounding in the double-ceil token0 delta can still land a zero-for-one
/// step a hair past the target; such a result is pinned to the target.
pub fn compute_step_towards(
    amount_in: &BigInt,
    sqrt_price_x96: &BigInt,
    target_x96: &BigInt,
    liquidity: &BigInt,
    fee_ppm: u32,
    zero_for_one: bool,
) -> Result<StepOutcome, MathError> {
    let outcome = compute_step(amount_in, sqrt_price_x96, liquidity, fee_ppm, zero_for_one)?;
    let overshot = if zero_for_one {
        outcome.sqrt_price_after_x96 < *target_x96
    } else {
        outcome.sqrt_price_after_x96 > *target_x96
    };
    if !overshot {
        return Ok(outcome);
    }

    log::debug!("step overshot target {} by rounding, pinning", target_x96);
    let (amount_in_net, amount_out) = in_out_between(sqrt_price_x96, target_x96, liquidity, zero_for_one);
    let amount_in_net = amount_in_net.min(amount_in.clone());
    Ok(StepOutcome {
        sqrt_price_after_x96: target_x96.clone(),
        fee_amount: amount_in - &amount_in_net,
        amount_in_net,
        amount_out,
    })
}
