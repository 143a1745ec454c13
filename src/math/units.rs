// Human <-> raw token unit conversion, for inputs and reporting only.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rust_decimal::Decimal;

/// Convert human -> raw integer units (rounded half up). Negative or non-finite input is zero.
///
/// Goes through the shortest decimal form of the float so `100_000.0` at 18
/// decimals is exactly `10^23`, not the nearest binary double.
pub fn to_raw(amount_human: f64, decimals: u8) -> BigInt {
    if !amount_human.is_finite() || amount_human <= 0.0 { return BigInt::zero(); }

    let Some(d) = Decimal::from_f64(amount_human) else {
        // beyond Decimal range: plain float scaling is as good as the input anyway
        let scale = 10f64.powi(decimals as i32);
        return BigInt::from_f64((amount_human * scale).round()).unwrap_or_default();
    };
    let d = d.normalize();
    let mantissa = BigInt::from(d.mantissa());
    let scale = d.scale();
    let decimals = decimals as u32;

    if scale <= decimals {
        mantissa * BigInt::from(10u8).pow(decimals - scale)
    } else {
        let div = BigInt::from(10u8).pow(scale - decimals);
        (mantissa * 2u8 + &div) / (div * 2u8)
    }
}

/// Convert raw integer units -> human f64 (lossy).
#[inline]
pub fn from_raw(amount: &BigInt, decimals: u8) -> f64 {
    let s = 10f64.powi(decimals as i32);
    amount.to_f64().unwrap_or(0.0) / s
}
