use anyhow::{ensure, Context, Result};

use crate::config::Config;
use crate::math::fees::FeeTier;

/// Validated defaults applied to requests that leave them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationDefaults {
    pub fee_tier: FeeTier,
    pub token_decimals: u8,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub defaults: SimulationDefaults,
}

// ERC-20 style tokens stay well below this
const MAX_TOKEN_DECIMALS: u8 = 36;

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let fee_tier = FeeTier::try_from(config.default_fee_ppm)
            .context("DEFAULT_FEE_PPM must be one of 100, 500, 3000, 10000")?;
        ensure!(
            config.token_decimals <= MAX_TOKEN_DECIMALS,
            "TOKEN_DECIMALS must be at most {}, got {}",
            MAX_TOKEN_DECIMALS,
            config.token_decimals
        );

        log::info!("simulation defaults: fee {} ppm, {} token decimals", fee_tier.fee_ppm(), config.token_decimals);
        Ok(AppState {
            defaults: SimulationDefaults { fee_tier, token_decimals: config.token_decimals },
        })
    }
}
