// Fixed-point concentrated-liquidity math.
//
// Sqrt prices are Q64.96 integers (sqrt(price) * 2^96) held in BigInt, amounts and
// liquidity are raw integer token units. Floats only appear at the human-price
// boundary (price <-> tick) and in reporting.

pub mod fees;
pub mod liquidity;
pub mod price_tick;
pub mod swap_step;
pub mod units;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

pub const RESOLUTION: u32 = 96;
pub const Q96_U128: u128 = 1u128 << RESOLUTION;

#[inline]
pub(crate) fn q96() -> BigInt { BigInt::from(Q96_U128) }

#[inline]
pub(crate) fn ceil_div(a: &BigInt, b: &BigInt) -> BigInt {
    // assumes a>=0, b>0
    if a.is_zero() { return BigInt::zero(); }
    Integer::div_ceil(a, b)
}

#[inline]
pub(crate) fn ordered(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    if a <= b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) }
}
