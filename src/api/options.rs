// src/api/options.rs
//! Optional query parameters for the endpoints that document more than one or two of them.
//!
//! Every field is optional and left out of the query string when unset. Lists are sent as
//! comma separated values.

use serde::Serialize;

/// `simple/price` and `simple/token_price/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_market_cap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_24hr_vol: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_24hr_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_last_updated_at: Option<bool>,
    /// `full` or a decimal count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<String>,
}

/// `coins/markets`
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// e.g. `market_cap_desc`, `volume_asc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparkline: Option<bool>,
    /// e.g. `["1h", "24h", "7d"]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_percentage: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<String>,
}

/// `coins/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoinOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparkline: Option<bool>,
}

/// `coins/{id}/tickers`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoinTickersOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_exchange_logo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<bool>,
}

/// `exchanges/{id}/tickers`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExchangeTickersOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_exchange_logo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// `coins/{id}/market_chart`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartOptions {
    /// `daily`, or unset for automatic granularity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Pagination {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            page: Some(page),
        }
    }
}

/// Paginated listings that also take an `order`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderedPagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// `finance_products`
#[derive(Debug, Clone, Default, Serialize)]
pub struct FinanceProductsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,
}

/// `status_updates`
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusUpdatesOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `coin`, `market` or `exchange`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// `events`
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_events_only: Option<bool>,
    /// `yyyy-mm-dd`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
}
