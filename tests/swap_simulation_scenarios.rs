// tests/swap_simulation_scenarios.rs
// ===================================
// End-to-end swaps through the simulator: in-range trades, tick crossings,
// starvation and determinism.

use clmm_swap_sim::engine::{Pool, SwapParams};
use clmm_swap_sim::math::fees::FeeTier;
use clmm_swap_sim::math::price_tick::price_to_tick;
use clmm_swap_sim::math::units::{from_raw, to_raw};
use clmm_swap_sim::models::{Position, SwapDirection, SwapStatus};
use clmm_swap_sim::MathError;
use num_bigint::BigInt;
use num_traits::Zero;

// ====== Test Helpers ======

fn position(lower: f64, upper: f64, liquidity: f64) -> Position {
    Position::from_prices(lower, upper, to_raw(liquidity, 18)).unwrap()
}

fn two_adjacent_ranges() -> Pool {
    let positions = vec![position(1950.0, 2050.0, 100_000.0), position(2050.0, 2150.0, 50_000.0)];
    Pool::from_positions(2000.0, FeeTier::Medium, &positions).unwrap()
}

// ====== Scenarios ======

#[test]
fn test_single_unit_swap_inside_one_range() {
    let pool = Pool::from_positions(2000.0, FeeTier::Medium, &[position(1900.0, 2100.0, 100_000.0)]).unwrap();
    let r = pool.simulate(&SwapParams::new(SwapDirection::ZeroForOne, to_raw(1.0, 18))).unwrap().result;

    println!("🔄 1 token0 -> {:.4} token1, fees {:.6}", from_raw(&r.amount_out, 18), from_raw(&r.fees_collected, 18));
    assert_eq!(r.steps.len(), 1);
    assert!(!r.steps[0].crossed_tick);
    assert!((from_raw(&r.fees_collected, 18) - 0.003).abs() < 1e-9);
    assert!(r.final_price < 2000.0);
    assert_eq!(r.status, SwapStatus::Exhausted);
}

#[test]
fn test_crossing_into_thinner_range() {
    let pool = two_adjacent_ranges();
    let boundary = price_to_tick(2050.0).unwrap();
    let t = pool.simulate(&SwapParams::new(SwapDirection::OneForZero, to_raw(80_000.0, 18))).unwrap();
    let r = &t.result;

    println!("📈 crossed {} tick(s), final price {:.4}", r.ticks_crossed(), r.final_price);
    assert_eq!(r.status, SwapStatus::Exhausted);
    assert_eq!(r.ticks_crossed(), 1);
    assert_eq!(r.steps.len(), 2);
    assert_eq!(r.steps[0].tick_crossed, Some(boundary));
    assert_eq!(r.steps[0].liquidity, to_raw(100_000.0, 18));
    assert_eq!(r.steps[1].liquidity, to_raw(50_000.0, 18));
    assert_eq!(t.next_state.active_liquidity, to_raw(50_000.0, 18));
    assert!(t.next_state.current_tick >= boundary);
    assert!(r.final_price > 2050.0 && r.final_price < 2150.0);
    assert!(r.price_impact < 0.0);
}

#[test]
fn test_crossing_back_down_restores_liquidity() {
    let mut pool = two_adjacent_ranges();
    pool.swap(&SwapParams::new(SwapDirection::OneForZero, to_raw(80_000.0, 18))).unwrap();
    assert_eq!(pool.state.active_liquidity, to_raw(50_000.0, 18));

    let back = pool.swap(&SwapParams::new(SwapDirection::ZeroForOne, to_raw(30.0, 18))).unwrap();
    assert_eq!(back.ticks_crossed(), 1);
    assert_eq!(pool.state.active_liquidity, to_raw(100_000.0, 18));
    assert!(pool.price() < 2050.0);
    assert_eq!(pool.state.active_liquidity, pool.ticks.active_liquidity_at(pool.state.current_tick));
}

#[test]
fn test_pool_priced_on_tick_crosses_it_first() {
    let boundary = price_to_tick(2050.0).unwrap();
    let positions = vec![position(1950.0, 2050.0, 100_000.0), position(2050.0, 2150.0, 50_000.0)];
    let pool = Pool::at_tick(boundary, FeeTier::Medium, &positions).unwrap();
    assert_eq!(pool.state.current_tick, boundary);
    assert_eq!(pool.state.active_liquidity, to_raw(50_000.0, 18));

    let t = pool.simulate(&SwapParams::new(SwapDirection::ZeroForOne, to_raw(10.0, 18))).unwrap();
    let r = &t.result;
    println!("🎯 {} step(s), crossed {:?} at zero cost", r.steps.len(), r.steps[0].tick_crossed);
    assert_eq!(r.status, SwapStatus::Exhausted);
    assert_eq!(r.steps.len(), 2);
    assert_eq!(r.steps[0].tick_crossed, Some(boundary));
    assert!(r.steps[0].amount_in.is_zero());
    assert_eq!(r.steps[1].liquidity, to_raw(100_000.0, 18));
    assert_eq!(t.next_state.active_liquidity, to_raw(100_000.0, 18));
    assert_eq!(t.next_state.active_liquidity, pool.ticks.active_liquidity_at(t.next_state.current_tick));
    assert!(r.final_price < 2050.0 && r.final_price > 1950.0);
}

#[test]
fn test_zero_active_liquidity_starves() {
    let pool = Pool::from_positions(2000.0, FeeTier::Medium, &[position(2500.0, 3000.0, 10_000.0)]).unwrap();
    assert!(pool.state.active_liquidity.is_zero());

    let t = pool.simulate(&SwapParams::new(SwapDirection::OneForZero, to_raw(1_000.0, 18))).unwrap();
    assert_eq!(t.result.status, SwapStatus::Starved);
    assert!(!t.result.is_complete());
    assert!(t.result.amount_in.is_zero());
    assert!(t.result.amount_out.is_zero());
    assert_eq!(t.next_state, pool.state);
}

#[test]
fn test_zero_and_negative_amounts() {
    let pool = two_adjacent_ranges();
    let t = pool.simulate(&SwapParams::new(SwapDirection::ZeroForOne, BigInt::zero())).unwrap();
    assert!(t.result.amount_out.is_zero());
    assert!(t.result.steps.is_empty());
    assert_eq!(t.next_state, pool.state);

    let err = pool.simulate(&SwapParams::new(SwapDirection::ZeroForOne, BigInt::from(-10))).unwrap_err();
    assert_eq!(err, MathError::NonPositiveAmount);
}

#[test]
fn test_identical_pools_give_identical_results() {
    let a = two_adjacent_ranges();
    let b = a.clone();
    let params = SwapParams::new(SwapDirection::OneForZero, to_raw(123_456.789, 18));
    assert_eq!(a.simulate(&params).unwrap(), b.simulate(&params).unwrap());
}

#[test]
fn test_fees_track_gross_input() {
    let pool = two_adjacent_ranges();
    for tier in FeeTier::ALL {
        let mut p = pool.clone();
        p.fee_tier = tier;
        let r = p.simulate(&SwapParams::new(SwapDirection::ZeroForOne, to_raw(10.0, 18))).unwrap().result;
        let expected = 10.0 * tier.fee_ppm() as f64 / 1e6;
        let fees = from_raw(&r.fees_collected, 18);
        println!("💰 tier {} ppm: fees {:.8} (expected ~{:.8})", tier.fee_ppm(), fees, expected);
        assert!((fees - expected).abs() < 1e-9);
    }
}
