// tests/liquidity_properties.rs
// ==============================
// Properties of the tick index and liquidity sizing over grids of inputs.

use clmm_swap_sim::engine::TickLiquidityIndex;
use clmm_swap_sim::math::liquidity::{amounts_for_position, liquidity_for_position};
use clmm_swap_sim::math::price_tick::{price_to_sqrt_price, price_to_tick, tick_to_price};
use clmm_swap_sim::math::units::to_raw;
use clmm_swap_sim::models::Position;
use clmm_swap_sim::MathError;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

#[test]
fn test_index_matches_brute_force_coverage() {
    let ranges = [(-600, 600, 7u64), (-60, 1200, 11), (0, 60, 13), (600, 900, 17), (-1200, -600, 19)];
    let positions: Vec<Position> = ranges
        .iter()
        .map(|(lo, hi, l)| Position::new(*lo, *hi, BigInt::from(*l) * BigInt::from(10u64).pow(18)).unwrap())
        .collect();
    let index = TickLiquidityIndex::from_positions(&positions);

    assert!(index.net_liquidity_sum().is_zero());
    for t in (-1500..=1500).step_by(30) {
        let covering: BigInt = positions.iter().filter(|p| p.contains(t)).map(|p| p.liquidity().clone()).sum();
        assert_eq!(index.active_liquidity_at(t), covering, "tick {}", t);
    }
}

#[test]
fn test_tick_price_round_trip() {
    for t in (-887_000..=887_000).step_by(12_345) {
        assert_eq!(price_to_tick(tick_to_price(t).unwrap()).unwrap(), t);
    }
}

#[test]
fn test_sizing_never_overcommits() {
    let lower = price_to_tick(1900.0).unwrap();
    let upper = price_to_tick(2100.0).unwrap();
    let amount0 = to_raw(25.0, 18);
    let amount1 = to_raw(40_000.0, 18);

    // below, inside and above the range
    for price in [1500.0, 1900.0, 1950.0, 2000.0, 2099.0, 2100.0, 2500.0] {
        let sp = price_to_sqrt_price(price).unwrap();
        let l = liquidity_for_position(&sp, lower, upper, &amount0, &amount1).unwrap();
        assert!(l.is_positive(), "price {}", price);

        let (used0, used1) = amounts_for_position(&sp, lower, upper, &l).unwrap();
        println!("📐 price {:>6}: L={} uses {} / {}", price, l, used0, used1);
        assert!(used0 <= amount0, "token0 overcommitted at {}", price);
        assert!(used1 <= amount1, "token1 overcommitted at {}", price);
    }
}

#[test]
fn test_inverted_or_empty_ranges_rejected() {
    let sp = price_to_sqrt_price(2000.0).unwrap();
    let one = BigInt::from(1_000_000);
    for (lo, hi) in [(100, 100), (200, -200)] {
        assert!(matches!(liquidity_for_position(&sp, lo, hi, &one, &one), Err(MathError::InvalidRange { .. })));
        assert!(matches!(amounts_for_position(&sp, lo, hi, &one), Err(MathError::InvalidRange { .. })));
    }
}
