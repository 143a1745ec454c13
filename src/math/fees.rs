// Fee tiers and LP fee accrual.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MathError;

pub const FEE_DENOMINATOR_PPM: u32 = 1_000_000; // ppm

/// Fixed proportional trading fee selectable per pool.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.30%
    Medium,
    /// 1.00%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn fee_ppm(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low    => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High   => 10_000,
        }
    }

    /// Fee as a fraction, e.g. 0.003 for [`FeeTier::Medium`].
    pub fn rate(self) -> Decimal {
        Decimal::new(self.fee_ppm() as i64, 6)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = MathError;

    fn try_from(fee_ppm: u32) -> Result<Self, Self::Error> {
        FeeTier::ALL
            .into_iter()
            .find(|t| t.fee_ppm() == fee_ppm)
            .ok_or(MathError::UnsupportedFeeTier(fee_ppm))
    }
}

// share precision when dividing two liquidity values
const SHARE_SCALE: u32 = 18;

/// Fees earned by `my_liquidity` out of `total_pool_liquidity` over a period
/// that traded `pool_volume_usd`:
/// `my / total * volume * fee_rate`.
pub fn fees_earned(
    my_liquidity: &BigInt,
    pool_volume_usd: Decimal,
    total_pool_liquidity: &BigInt,
    fee_rate: Decimal,
) -> Result<Decimal, MathError> {
    if total_pool_liquidity.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    if my_liquidity.is_negative() || total_pool_liquidity.is_negative() {
        return Err(MathError::NonPositiveLiquidity);
    }

    // share as a fixed-point integer so arbitrarily large liquidity values stay exact
    let scaled = (my_liquidity * BigInt::from(10u8).pow(SHARE_SCALE)) / total_pool_liquidity;
    let share = scaled
        .to_i128()
        .and_then(|v| Decimal::try_from_i128_with_scale(v, SHARE_SCALE).ok())
        .ok_or(MathError::Overflow)?;

    share
        .checked_mul(pool_volume_usd)
        .and_then(|v| v.checked_mul(fee_rate))
        .ok_or(MathError::Overflow)
}
