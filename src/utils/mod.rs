// src/utils/mod.rs
use log::{info, LevelFilter};

/// Installs a stdout logger at `info`. Per-request logging is emitted at `debug`.
pub fn setup_logging() -> Result<(), fern::InitError> {
    setup_logging_with_level(LevelFilter::Info)
}

pub fn setup_logging_with_level(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}

/// Level parsed from `COINGECKO_LOG`, defaulting to `info`.
pub fn level_from_env() -> LevelFilter {
    std::env::var("COINGECKO_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Info)
}
