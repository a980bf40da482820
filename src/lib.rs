pub mod api;
pub mod config;
pub mod error;
pub mod testing; // In-memory transport for tests
pub mod utils;

pub use api::{
    CoinGeckoSession, Days, Endpoint, HttpMethod, Pagination, QueryParams, SessionState,
};
pub use config::{load_config, ApiKey, Config, KeyPlacement};
pub use error::{CoinGeckoError, ErrorCategory, Result};
