use std::sync::Arc;

use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::{get, post, State};

use crate::bootstrap::AppState;
use crate::engine::service::{analyze_swap, build_pool, estimate_fees, size_position, PositionInput};
use crate::math::price_tick::sqrt_price_to_price;
use crate::math::units::from_raw;
use crate::web::dto::{
    status_label, ErrorResponse, FeesEarnedQuery, FeesEarnedResponse, LiquidityBandDto, PoolStateDto, PositionSizeRequest,
    PositionSizeResponse, SimulateSwapRequest, SimulateSwapResponse, SwapStepDto,
};

type ApiResult<T> = Result<Json<T>, BadRequest<Json<ErrorResponse>>>;

fn now() -> String { chrono::Utc::now().to_rfc3339() }

fn bad_request(context: &str, e: anyhow::Error) -> BadRequest<Json<ErrorResponse>> {
    log::error!("{}: {:#}", context, e);
    BadRequest(Json(ErrorResponse { timestamp_utc: now(), error: format!("{:#}", e) }))
}

#[post("/api/v1/simulate-swap", data = "<request>")]
pub fn simulate_swap(request: Json<SimulateSwapRequest>, app_state: &State<Arc<AppState>>) -> ApiResult<SimulateSwapResponse> {
    let defaults = &app_state.defaults;
    let positions: Vec<PositionInput> = request
        .positions
        .iter()
        .map(|p| PositionInput { lower_price: p.lower_price, upper_price: p.upper_price, liquidity: p.liquidity })
        .collect();

    let analysis = build_pool(defaults, request.price, request.fee_ppm, &positions)
        .and_then(|pool| analyze_swap(defaults, &pool, request.direction.into(), request.amount_in))
        .map_err(|e| bad_request("Failed to simulate swap", e))?;

    let r = &analysis.result;
    let steps = r
        .steps
        .iter()
        .map(|s| SwapStepDto {
            amount_in: analysis.human(&s.amount_in),
            fee_amount: analysis.human(&s.fee_amount),
            amount_out: analysis.human(&s.amount_out),
            price_before: sqrt_price_to_price(&s.sqrt_price_before_x96),
            price_after: sqrt_price_to_price(&s.sqrt_price_after_x96),
            liquidity: analysis.human(&s.liquidity),
            tick_crossed: s.tick_crossed,
        })
        .collect();
    let liquidity_bands = analysis
        .liquidity_bands
        .iter()
        .map(|b| LiquidityBandDto {
            tick: b.tick,
            price: b.price,
            liquidity_net: b.liquidity_net.to_string(),
            active_liquidity: b.active_liquidity.to_string(),
        })
        .collect();

    Ok(Json(SimulateSwapResponse {
        timestamp_utc: analysis.timestamp_utc.clone(),
        direction: r.direction.into(),
        fee_ppm: analysis.fee_tier.fee_ppm(),
        status: status_label(r.status).to_string(),
        unbounded: r.unbounded,
        amount_in: analysis.human(&r.amount_in),
        amount_out: analysis.human(&r.amount_out),
        amount_remaining: analysis.human(&r.amount_remaining),
        fees_collected: analysis.human(&r.fees_collected),
        amount_in_raw: r.amount_in.to_string(),
        amount_out_raw: r.amount_out.to_string(),
        initial_price: r.initial_price,
        final_price: r.final_price,
        execution_price: analysis.execution_price,
        price_impact_percent: r.price_impact * 100.0,
        ticks_crossed: r.ticks_crossed(),
        steps,
        next_state: PoolStateDto {
            current_tick: analysis.next_state.current_tick,
            sqrt_price_x96: analysis.next_state.sqrt_price_x96.to_string(),
            active_liquidity: analysis.next_state.active_liquidity.to_string(),
            price: analysis.spot_price_after,
        },
        liquidity_bands,
    }))
}

#[post("/api/v1/position/size", data = "<request>")]
pub fn position_size(request: Json<PositionSizeRequest>, app_state: &State<Arc<AppState>>) -> ApiResult<PositionSizeResponse> {
    let decimals = app_state.defaults.token_decimals;
    let sizing = size_position(
        &app_state.defaults,
        request.price,
        request.lower_price,
        request.upper_price,
        request.amount0,
        request.amount1,
    )
    .map_err(|e| bad_request("Failed to size position", e))?;

    Ok(Json(PositionSizeResponse {
        timestamp_utc: now(),
        lower_tick: sizing.lower_tick,
        upper_tick: sizing.upper_tick,
        liquidity: from_raw(&sizing.liquidity, decimals),
        liquidity_raw: sizing.liquidity.to_string(),
        amount0_used: from_raw(&sizing.amount0_used, decimals),
        amount1_used: from_raw(&sizing.amount1_used, decimals),
    }))
}

#[get("/api/v1/fees-earned?<query..>")]
pub fn fees_earned(query: FeesEarnedQuery, app_state: &State<Arc<AppState>>) -> ApiResult<FeesEarnedResponse> {
    let defaults = &app_state.defaults;
    let fees = estimate_fees(defaults, query.my_liquidity, query.total_liquidity, query.pool_volume_usd, query.fee_ppm)
        .map_err(|e| bad_request("Failed to estimate fees", e))?;

    Ok(Json(FeesEarnedResponse {
        timestamp_utc: now(),
        fee_ppm: query.fee_ppm.unwrap_or(defaults.fee_tier.fee_ppm()),
        fees_earned_usd: fees,
    }))
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}
