use std::env;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Fee tier used when a request does not name one.
    pub default_fee_ppm: u32,
    /// Raw-unit scale for human amounts and liquidity on the HTTP surface.
    pub token_decimals: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config { port: 8000, default_fee_ppm: 3_000, token_decimals: 18 }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // local overrides first, then the regular .env
        dotenv::from_filename("config/simulator.env").ok();
        dotenv::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to [`Config::default`].
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            default_fee_ppm: parse_or(&lookup, "DEFAULT_FEE_PPM", defaults.default_fee_ppm)?,
            token_decimals: parse_or(&lookup, "TOKEN_DECIMALS", defaults.token_decimals)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{} has invalid value {:?}", key, raw)),
        None => Ok(default),
    }
}
