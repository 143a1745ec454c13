use num_bigint::BigInt;
use thiserror::Error;

/// Input-validation failures of the math engine.
///
/// These are returned immediately and never retried internally. A swap that
/// runs out of liquidity is not an error; see [`crate::models::SwapStatus`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("invalid range: lower bound {lower} must be strictly below upper bound {upper}")]
    InvalidRange { lower: String, upper: String },

    #[error("invalid price {0}: must be finite and > 0")]
    InvalidPrice(f64),

    #[error("tick {0} outside [-887272, 887272]")]
    TickOutOfRange(i64),

    #[error("sqrt price {0} outside the representable tick range")]
    SqrtPriceOutOfRange(BigInt),

    #[error("liquidity must be positive")]
    NonPositiveLiquidity,

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("unsupported fee tier: {0} ppm")]
    UnsupportedFeeTier(u32),
}

impl MathError {
    pub(crate) fn range<T: ToString>(lower: T, upper: T) -> Self {
        MathError::InvalidRange { lower: lower.to_string(), upper: upper.to_string() }
    }
}
