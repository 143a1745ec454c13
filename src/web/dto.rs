use rocket::serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

use crate::models::{SwapDirection, SwapStatus};

/// Wire form of [`SwapDirection`], independent of the core's serde feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum DirectionDto { ZeroForOne, OneForZero }

impl From<DirectionDto> for SwapDirection {
    fn from(d: DirectionDto) -> Self {
        match d {
            DirectionDto::ZeroForOne => SwapDirection::ZeroForOne,
            DirectionDto::OneForZero => SwapDirection::OneForZero,
        }
    }
}

impl From<SwapDirection> for DirectionDto {
    fn from(d: SwapDirection) -> Self {
        match d {
            SwapDirection::ZeroForOne => DirectionDto::ZeroForOne,
            SwapDirection::OneForZero => DirectionDto::OneForZero,
        }
    }
}

pub fn status_label(status: SwapStatus) -> &'static str {
    match status {
        SwapStatus::Exhausted => "exhausted",
        SwapStatus::Starved => "starved",
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PositionRequest {
    pub lower_price: f64,
    pub upper_price: f64,
    /// Human units, scaled by the configured token decimals.
    pub liquidity: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SimulateSwapRequest {
    pub price: f64,
    pub fee_ppm: Option<u32>,
    pub positions: Vec<PositionRequest>,
    pub direction: DirectionDto,
    pub amount_in: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SwapStepDto {
    pub amount_in: f64,
    pub fee_amount: f64,
    pub amount_out: f64,
    pub price_before: f64,
    pub price_after: f64,
    pub liquidity: f64,
    pub tick_crossed: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct PoolStateDto {
    pub current_tick: i32,
    pub sqrt_price_x96: String,
    pub active_liquidity: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LiquidityBandDto {
    pub tick: i32,
    pub price: f64,
    pub liquidity_net: String,
    pub active_liquidity: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SimulateSwapResponse {
    pub timestamp_utc: String,
    pub direction: DirectionDto,
    pub fee_ppm: u32,
    pub status: String,
    pub unbounded: bool,
    pub amount_in: f64,
    pub amount_out: f64,
    pub amount_remaining: f64,
    pub fees_collected: f64,
    // raw integer units, as strings
    pub amount_in_raw: String,
    pub amount_out_raw: String,
    pub initial_price: f64,
    pub final_price: f64,
    pub execution_price: f64,
    pub price_impact_percent: f64,
    pub ticks_crossed: usize,
    pub steps: Vec<SwapStepDto>,
    pub next_state: PoolStateDto,
    pub liquidity_bands: Vec<LiquidityBandDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PositionSizeRequest {
    pub price: f64,
    pub lower_price: f64,
    pub upper_price: f64,
    pub amount0: f64,
    pub amount1: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct PositionSizeResponse {
    pub timestamp_utc: String,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub liquidity: f64,
    pub liquidity_raw: String,
    pub amount0_used: f64,
    pub amount1_used: f64,
}

#[derive(Debug, Deserialize, rocket::FromForm)]
#[serde(crate = "rocket::serde")]
pub struct FeesEarnedQuery {
    pub my_liquidity: f64,
    pub total_liquidity: f64,
    pub pool_volume_usd: f64,
    pub fee_ppm: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct FeesEarnedResponse {
    pub timestamp_utc: String,
    pub fee_ppm: u32,
    pub fees_earned_usd: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub timestamp_utc: String,
    pub error: String,
}
