// Liquidity <-> token amounts over a sqrt-price range.
// ----------------------------------------------------
// All sqrt prices are Q64.96, amounts and liquidity are raw integer units.
// Rounding: liquidity and amounts handed back to the user are floored; the
// swap engine asks for round_up=true when computing what the pool is owed.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::error::MathError;
use crate::math::price_tick::sqrt_price_at_tick;
use crate::math::{ceil_div, ordered, q96};

// ------------------------------ Token deltas -------------------------------

#[inline]
fn div_rounding(numerator: &BigInt, denominator: &BigInt, round_up: bool) -> BigInt {
    if round_up { ceil_div(numerator, denominator) } else { numerator / denominator }
}

/// Token0 spanned by `liquidity` between two sqrt prices, in either order:
/// `L * (upper - lower) / (upper * lower)` with the Q96 scale folded in.
///
/// Divides by `upper` then by `lower`, rounding both divisions the same way.
pub fn amount0_delta(
    sqrt_ratio_a_x96: &BigInt,
    sqrt_ratio_b_x96: &BigInt,
    liquidity: &BigInt,
    round_up: bool,
) -> BigInt {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if liquidity.is_zero() || lower.is_zero() || lower == upper {
        return BigInt::zero();
    }
    let span = (liquidity << 96) * (&upper - &lower);
    div_rounding(&div_rounding(&span, &upper, round_up), &lower, round_up)
}

/// Token1 spanned by `liquidity` between two sqrt prices, in either order:
/// `L * (upper - lower) / Q96`.
pub fn amount1_delta(
    sqrt_ratio_a_x96: &BigInt,
    sqrt_ratio_b_x96: &BigInt,
    liquidity: &BigInt,
    round_up: bool,
) -> BigInt {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if liquidity.is_zero() || lower == upper {
        return BigInt::zero();
    }
    div_rounding(&(liquidity * (upper - lower)), &q96(), round_up)
}

// ------------------------- Liquidity from amounts --------------------------

/// L0 = amount0 * (sa * sb) / ((sb - sa) << 96), floored.
pub fn liquidity_for_amount0(sqrt_a_x96: &BigInt, sqrt_b_x96: &BigInt, amount0: &BigInt) -> BigInt {
    let (sa, sb) = ordered(sqrt_a_x96, sqrt_b_x96);
    let denom = (&sb - &sa) * q96();
    if denom.is_zero() { return BigInt::zero(); }
    (amount0 * &sa * &sb) / denom
}

/// L1 = amount1 * Q96 / (sb - sa), floored.
pub fn liquidity_for_amount1(sqrt_a_x96: &BigInt, sqrt_b_x96: &BigInt, amount1: &BigInt) -> BigInt {
    let (sa, sb) = ordered(sqrt_a_x96, sqrt_b_x96);
    let diff = &sb - &sa;
    if diff.is_zero() { return BigInt::zero(); }
    (amount1 * q96()) / diff
}

fn check_bounds(
    sqrt_price_x96: &BigInt,
    sqrt_lower_x96: &BigInt,
    sqrt_upper_x96: &BigInt,
) -> Result<(BigInt, BigInt), MathError> {
    if !sqrt_price_x96.is_positive() || !sqrt_lower_x96.is_positive() || !sqrt_upper_x96.is_positive() {
        return Err(MathError::SqrtPriceOutOfRange(sqrt_price_x96.clone().min(sqrt_lower_x96.clone()).min(sqrt_upper_x96.clone())));
    }
    let (sa, sb) = ordered(sqrt_lower_x96, sqrt_upper_x96);
    if sa == sb {
        return Err(MathError::range(sa, sb));
    }
    Ok((sa, sb))
}

/// Largest liquidity that `amount0`/`amount1` can back over `[lower, upper]`
/// at the current sqrt price. Inverted bounds are swapped.
///
/// Below the range only token0 counts, above it only token1, inside it the
/// scarcer side wins so neither token is over-committed.
pub fn liquidity_from_amounts(
    sqrt_price_x96: &BigInt,
    sqrt_lower_x96: &BigInt,
    sqrt_upper_x96: &BigInt,
    amount0: &BigInt,
    amount1: &BigInt,
) -> Result<BigInt, MathError> {
    if amount0.is_negative() || amount1.is_negative() {
        return Err(MathError::NonPositiveAmount);
    }
    let (sa, sb) = check_bounds(sqrt_price_x96, sqrt_lower_x96, sqrt_upper_x96)?;

    let liquidity = if *sqrt_price_x96 <= sa {
        liquidity_for_amount0(&sa, &sb, amount0)
    } else if *sqrt_price_x96 >= sb {
        liquidity_for_amount1(&sa, &sb, amount1)
    } else {
        let l0 = liquidity_for_amount0(sqrt_price_x96, &sb, amount0);
        let l1 = liquidity_for_amount1(&sa, sqrt_price_x96, amount1);
        l0.min(l1)
    };
    Ok(liquidity)
}

/// Token amounts represented by `liquidity` over `[lower, upper]` at the
/// current sqrt price, rounded down.
pub fn amounts_from_liquidity(
    sqrt_price_x96: &BigInt,
    sqrt_lower_x96: &BigInt,
    sqrt_upper_x96: &BigInt,
    liquidity: &BigInt,
) -> Result<(BigInt, BigInt), MathError> {
    if liquidity.is_negative() {
        return Err(MathError::NonPositiveLiquidity);
    }
    let (sa, sb) = check_bounds(sqrt_price_x96, sqrt_lower_x96, sqrt_upper_x96)?;

    let amounts = if *sqrt_price_x96 <= sa {
        (amount0_delta(&sa, &sb, liquidity, false), BigInt::zero())
    } else if *sqrt_price_x96 >= sb {
        (BigInt::zero(), amount1_delta(&sa, &sb, liquidity, false))
    } else {
        (
            amount0_delta(sqrt_price_x96, &sb, liquidity, false),
            amount1_delta(&sa, sqrt_price_x96, liquidity, false),
        )
    };
    Ok(amounts)
}

// ----------------------------- Tick-addressed ------------------------------

/// [`liquidity_from_amounts`] for a tick range. `lower_tick >= upper_tick` is rejected.
pub fn liquidity_for_position(
    sqrt_price_x96: &BigInt,
    lower_tick: i32,
    upper_tick: i32,
    amount0: &BigInt,
    amount1: &BigInt,
) -> Result<BigInt, MathError> {
    if lower_tick >= upper_tick {
        return Err(MathError::range(lower_tick, upper_tick));
    }
    let sa = sqrt_price_at_tick(lower_tick)?;
    let sb = sqrt_price_at_tick(upper_tick)?;
    liquidity_from_amounts(sqrt_price_x96, &sa, &sb, amount0, amount1)
}

/// [`amounts_from_liquidity`] for a tick range. `lower_tick >= upper_tick` is rejected.
pub fn amounts_for_position(
    sqrt_price_x96: &BigInt,
    lower_tick: i32,
    upper_tick: i32,
    liquidity: &BigInt,
) -> Result<(BigInt, BigInt), MathError> {
    if lower_tick >= upper_tick {
        return Err(MathError::range(lower_tick, upper_tick));
    }
    let sa = sqrt_price_at_tick(lower_tick)?;
    let sb = sqrt_price_at_tick(upper_tick)?;
    amounts_from_liquidity(sqrt_price_x96, &sa, &sb, liquidity)
}
