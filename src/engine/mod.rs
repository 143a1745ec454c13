pub mod pool;
pub mod quote;
pub mod service;
pub mod simulator;
pub mod tick_index;

pub use pool::Pool;
pub use simulator::{simulate_swap, SwapParams, SwapTransition};
pub use tick_index::{Direction, LiquidityBand, TickLiquidityIndex};
