//! Prints server status, top markets and a week of BTC candles.
//!
//! `COINGECKO_DEMO_API_KEY` (or `COINGECKO_PRO_API_KEY`) is read from the environment or `.env`.

use anyhow::{Context, Result};
use coingecko_session::api::{CoinGeckoSession, MarketsOptions};
use coingecko_session::utils::{level_from_env, setup_logging_with_level};
use coingecko_session::{load_config, Days};
use futures::FutureExt;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging_with_level(level_from_env()).context("failed to initialize logging")?;
    let config = load_config().context("invalid CoinGecko configuration")?;

    CoinGeckoSession::new(config)
        .scope(|session| {
            async move {
                let status = session.ping().await?;
                info!("Server status: {}", status["gecko_says"]);

                let markets = session
                    .coins_markets(
                        "usd",
                        &MarketsOptions {
                            per_page: Some(5),
                            order: Some("market_cap_desc".to_string()),
                            ..Default::default()
                        },
                    )
                    .await?;
                for coin in markets.as_array().into_iter().flatten() {
                    info!(
                        "{:>10} {:>14} USD",
                        coin["symbol"].as_str().unwrap_or("?"),
                        coin["current_price"]
                    );
                }

                let candles = session.coin_ohlc("bitcoin", "usd", Days::Count(7), None).await?;
                info!(
                    "bitcoin: {} OHLC candles over 7 days",
                    candles.as_array().map_or(0, Vec::len)
                );
                Ok::<_, anyhow::Error>(())
            }
            .boxed()
        })
        .await
}
