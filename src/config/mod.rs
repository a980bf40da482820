pub mod settings;

pub use settings::{ApiKey, Config, KeyPlacement, PRO_API_BASE_URL, PUBLIC_API_BASE_URL};

use crate::error::{CoinGeckoError, Result};

/// Loads the client configuration from the process environment, reading `.env` first if present.
pub fn load_config() -> Result<Config> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = settings::Config::from_env();

    let is_set = |name: &str| {
        std::env::var(name)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    };
    if is_set("COINGECKO_PRO_API_KEY") && is_set("COINGECKO_DEMO_API_KEY") {
        return Err(CoinGeckoError::Config(
            "set only one of COINGECKO_PRO_API_KEY and COINGECKO_DEMO_API_KEY".to_string(),
        ));
    }
    config.validate()?;

    config.validate_and_log();

    Ok(config)
}
