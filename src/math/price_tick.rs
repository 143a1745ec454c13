// Price <-> tick <-> sqrt-price conversion.
// ------------------------------------------
// Two layers live here:
// - human prices (f64): price = 1.0001^tick, floor semantics going price -> tick;
// - exact on-grid sqrt ratios (Q64.96 BigInt) used by the swap engine at tick
//   boundaries, built from the canonical bit-decomposition constants.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, ToPrimitive};

use crate::error::MathError;
use crate::math::Q96_U128;

pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 =  887_272;

/// sqrt_price_at_tick(MIN_TICK)
pub const MIN_SQRT_RATIO: u128 = 4_295_128_739;
/// sqrt_price_at_tick(MAX_TICK) as a decimal string (does not fit in u128).
const MAX_SQRT_RATIO_DEC: &[u8] = b"1461446703485210103287273052203988822378723970342";

const TICK_BASE: f64 = 1.0001;

// 1 / sqrt(1.0001)^(2^i) in Q128.128, for bit i of |tick| (i >= 1).
const RATIO_STEPS: [(u32, u128); 19] = [
    (0x2,     0xfff97272373d413259a46990580e213a),
    (0x4,     0xfff2e50f5f656932ef12357cf3c7fdcc),
    (0x8,     0xffe5caca7e10e4e61c3624eaa0941cd0),
    (0x10,    0xffcb9843d60f6159c9db58835c926644),
    (0x20,    0xff973b41fa98c081472e6896dfb254c0),
    (0x40,    0xff2ea16466c96a3843ec78b326b52861),
    (0x80,    0xfe5dee046a99a2a811c461f1969c3053),
    (0x100,   0xfcbe86c7900a88aedcffc83b479aa3a4),
    (0x200,   0xf987a7253ac413176f2b074cf7815e54),
    (0x400,   0xf3392b0822b70005940c7a398e4b70f3),
    (0x800,   0xe7159475a2c29b7443b29c7fa6e889d9),
    (0x1000,  0xd097f3bdfd2022b8845ad8f792aa5825),
    (0x2000,  0xa9f746462d870fdf8a65dc1f90e061e5),
    (0x4000,  0x70d869a156d2a1b890bb3df62baf32f7),
    (0x8000,  0x31be135f97d08fd981231505542fcfa6),
    (0x10000, 0x09aa508b5b7a84e1c677de54f3e99bc9),
    (0x20000, 0x005d6af8dedb81196699c329225ee604),
    (0x40000, 0x2216e584f5fa1ea926041bedfe98),
    (0x80000, 0x00000000048a170391f7dc42444e8fa2),
];
const RATIO_BIT0: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

#[inline]
fn check_tick(tick: i32) -> Result<(), MathError> {
    if (MIN_TICK..=MAX_TICK).contains(&tick) { Ok(()) } else { Err(MathError::TickOutOfRange(tick as i64)) }
}

pub fn min_sqrt_ratio() -> BigInt { BigInt::from(MIN_SQRT_RATIO) }

pub fn max_sqrt_ratio() -> BigInt {
    // constant literal, always parses
    BigInt::parse_bytes(MAX_SQRT_RATIO_DEC, 10).unwrap_or_else(|| BigInt::from(u128::MAX))
}

// ------------------------------ Human prices -------------------------------

/// `1.0001^tick`.
pub fn tick_to_price(tick: i32) -> Result<f64, MathError> {
    check_tick(tick)?;
    Ok(TICK_BASE.powi(tick))
}

/// Largest tick whose price does not exceed `price`.
pub fn price_to_tick(price: f64) -> Result<i32, MathError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(MathError::InvalidPrice(price));
    }
    let estimate = (price.ln() / TICK_BASE.ln()).floor();
    if estimate < (MIN_TICK - 1) as f64 || estimate > (MAX_TICK + 1) as f64 {
        return Err(MathError::TickOutOfRange(estimate as i64));
    }

    // the log estimate can sit one tick off right at a boundary; settle it against powi
    let mut tick = estimate as i32;
    while tick <= MAX_TICK && TICK_BASE.powi(tick + 1) <= price { tick += 1; }
    while tick >= MIN_TICK && TICK_BASE.powi(tick) > price { tick -= 1; }

    check_tick(tick)?;
    Ok(tick)
}

/// `sqrt(price) * 2^96`, truncated to an integer.
pub fn price_to_sqrt_price(price: f64) -> Result<BigInt, MathError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(MathError::InvalidPrice(price));
    }
    let scaled = price.sqrt() * (Q96_U128 as f64);
    BigInt::from_f64(scaled.floor()).ok_or(MathError::InvalidPrice(price))
}

/// `(sqrt_price_x96 / 2^96)^2`, lossy, for reporting.
pub fn sqrt_price_to_price(sqrt_price_x96: &BigInt) -> f64 {
    let s = sqrt_price_x96.to_f64().unwrap_or(0.0) / (Q96_U128 as f64);
    s * s
}

// ---------------------------- Exact grid ratios ----------------------------

/// Exact sqrt ratio at `tick` in Q64.96, rounded up.
pub fn sqrt_price_at_tick(tick: i32) -> Result<BigInt, MathError> {
    check_tick(tick)?;
    let abs_tick = tick.unsigned_abs();

    // ratio is Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        BigInt::from(RATIO_BIT0)
    } else {
        BigInt::one() << 128
    };
    for (bit, factor) in RATIO_STEPS {
        if abs_tick & bit != 0 {
            ratio = (&ratio * BigInt::from(factor)) >> 128;
        }
    }

    if tick > 0 {
        let max = (BigInt::one() << 256) - 1;
        ratio = max / ratio;
    }
    // round-up shift by 32 (Q128.128 -> Q64.96)
    Ok((&ratio + ((BigInt::one() << 32) - 1)) >> 32)
}

/// Largest tick whose exact sqrt ratio does not exceed `sqrt_price_x96`.
pub fn tick_at_sqrt_price(sqrt_price_x96: &BigInt) -> Result<i32, MathError> {
    if *sqrt_price_x96 < min_sqrt_ratio() || *sqrt_price_x96 > max_sqrt_ratio() {
        return Err(MathError::SqrtPriceOutOfRange(sqrt_price_x96.clone()));
    }
    let mut lo = MIN_TICK;
    let mut hi = MAX_TICK;
    while lo < hi {
        let mid = lo + ((hi - lo + 1) / 2);
        if sqrt_price_at_tick(mid)? <= *sqrt_price_x96 { lo = mid; } else { hi = mid - 1; }
    }
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_price_round_trip_is_exact() {
        for t in [MIN_TICK, -500_000, -76_012, -1, 0, 1, 2, 60, 76_012, 500_000, MAX_TICK] {
            let p = tick_to_price(t).unwrap();
            assert_eq!(price_to_tick(p).unwrap(), t, "tick {}", t);
        }
    }

    #[test]
    fn price_to_tick_floors() {
        // 2000 sits strictly between two ticks
        let t = price_to_tick(2000.0).unwrap();
        assert!(tick_to_price(t).unwrap() <= 2000.0);
        assert!(tick_to_price(t + 1).unwrap() > 2000.0);
        assert_eq!(price_to_tick(1.0).unwrap(), 0);
        assert_eq!(price_to_tick(0.99999).unwrap(), -1);
    }

    #[test]
    fn rejects_bad_prices_and_ticks() {
        assert_eq!(price_to_tick(0.0), Err(MathError::InvalidPrice(0.0)));
        assert_eq!(price_to_tick(-3.0), Err(MathError::InvalidPrice(-3.0)));
        assert!(matches!(price_to_tick(f64::NAN), Err(MathError::InvalidPrice(_))));
        assert!(matches!(price_to_tick(1e300), Err(MathError::TickOutOfRange(_))));
        assert_eq!(tick_to_price(MAX_TICK + 1), Err(MathError::TickOutOfRange(887_273)));
        assert_eq!(sqrt_price_at_tick(MIN_TICK - 1), Err(MathError::TickOutOfRange(-887_273)));
        assert!(price_to_sqrt_price(0.0).is_err());
    }

    #[test]
    fn grid_ratios_match_known_constants() {
        assert_eq!(sqrt_price_at_tick(0).unwrap(), BigInt::from(Q96_U128));
        assert_eq!(sqrt_price_at_tick(MIN_TICK).unwrap(), min_sqrt_ratio());
        assert_eq!(sqrt_price_at_tick(MAX_TICK).unwrap(), max_sqrt_ratio());
    }

    #[test]
    fn tick_at_sqrt_price_inverts_grid() {
        for t in [MIN_TICK, -200_000, -1, 0, 1, 73_136, MAX_TICK] {
            let s = sqrt_price_at_tick(t).unwrap();
            assert_eq!(tick_at_sqrt_price(&s).unwrap(), t);
            if t < MAX_TICK {
                assert_eq!(tick_at_sqrt_price(&(s + 1)).unwrap(), t);
            }
        }
        assert!(tick_at_sqrt_price(&BigInt::from(1u8)).is_err());
    }

    #[test]
    fn sqrt_price_conversions_agree() {
        let sp = price_to_sqrt_price(2000.0).unwrap();
        let back = sqrt_price_to_price(&sp);
        assert!((back - 2000.0).abs() / 2000.0 < 1e-12, "back {}", back);

        let grid = sqrt_price_to_price(&sqrt_price_at_tick(76_012).unwrap());
        let float = tick_to_price(76_012).unwrap();
        assert!((grid - float).abs() / float < 1e-9);
    }
}
