// src/api/endpoints.rs
//! CoinGecko v3 endpoint table.
//!
//! Every endpoint method on the session is a thin typed front for one row of [`ENDPOINTS`]:
//! the row owns the HTTP method, the path template and the documented query parameters, and
//! the session does the rest the same way for all of them.

use crate::api::params::QueryParams;
use crate::error::{CoinGeckoError, Result};
use log::warn;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Ping,
    ApiKeyUsage,
    SimplePrice,
    SimpleTokenPrice,
    SupportedVsCurrencies,
    CoinsList,
    CoinsMarkets,
    Coin,
    CoinTickers,
    CoinHistory,
    CoinMarketChart,
    CoinMarketChartRange,
    CoinStatusUpdates,
    CoinOhlc,
    ContractCoin,
    ContractMarketChart,
    ContractMarketChartRange,
    AssetPlatforms,
    CoinsCategoriesList,
    CoinsCategories,
    Exchanges,
    ExchangesList,
    Exchange,
    ExchangeTickers,
    ExchangeStatusUpdates,
    ExchangeVolumeChart,
    FinancePlatforms,
    FinanceProducts,
    Indexes,
    Index,
    IndexesList,
    Derivatives,
    DerivativesExchanges,
    DerivativesExchange,
    DerivativesExchangesList,
    NftsList,
    Nft,
    StatusUpdates,
    Events,
    EventsCountries,
    EventsTypes,
    ExchangeRates,
    Search,
    SearchTrending,
    Global,
    GlobalDefi,
    CompaniesPublicTreasury,
}

/// One row of the endpoint table.
#[derive(Debug)]
pub struct EndpointSpec {
    pub endpoint: Endpoint,
    pub name: &'static str,
    pub method: HttpMethod,
    /// Relative to the API base; `{name}` segments are filled from path arguments.
    pub path: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

const PAGINATION: &[&str] = &["per_page", "page"];
const SIMPLE_PRICE_EXTRAS: &[&str] = &[
    "include_market_cap",
    "include_24hr_vol",
    "include_24hr_change",
    "include_last_updated_at",
    "precision",
];

macro_rules! endpoint {
    ($variant:ident, $name:literal, $method:ident, $path:literal, [$($req:literal),*], $opt:expr) => {
        EndpointSpec {
            endpoint: Endpoint::$variant,
            name: $name,
            method: HttpMethod::$method,
            path: $path,
            required: &[$($req),*],
            optional: $opt,
        }
    };
}

pub static ENDPOINTS: &[EndpointSpec] = &[
    // ping / key
    endpoint!(Ping, "ping", Get, "ping", [], &[]),
    endpoint!(ApiKeyUsage, "api_key_usage", Get, "key", [], &[]),
    // simple
    endpoint!(SimplePrice, "simple_price", Get, "simple/price", ["ids", "vs_currencies"], SIMPLE_PRICE_EXTRAS),
    endpoint!(
        SimpleTokenPrice,
        "simple_token_price",
        Get,
        "simple/token_price/{id}",
        ["contract_addresses", "vs_currencies"],
        SIMPLE_PRICE_EXTRAS
    ),
    endpoint!(SupportedVsCurrencies, "supported_vs_currencies", Get, "simple/supported_vs_currencies", [], &[]),
    // coins
    endpoint!(CoinsList, "coins_list", Get, "coins/list", [], &["include_platform"]),
    endpoint!(
        CoinsMarkets,
        "coins_markets",
        Get,
        "coins/markets",
        ["vs_currency"],
        &[
            "ids",
            "category",
            "order",
            "per_page",
            "page",
            "sparkline",
            "price_change_percentage",
            "locale",
            "precision",
        ]
    ),
    endpoint!(
        Coin,
        "coin",
        Get,
        "coins/{id}",
        [],
        &[
            "localization",
            "tickers",
            "market_data",
            "community_data",
            "developer_data",
            "sparkline",
        ]
    ),
    endpoint!(
        CoinTickers,
        "coin_tickers",
        Get,
        "coins/{id}/tickers",
        [],
        &["exchange_ids", "include_exchange_logo", "page", "order", "depth"]
    ),
    endpoint!(CoinHistory, "coin_history", Get, "coins/{id}/history", ["date"], &["localization"]),
    endpoint!(
        CoinMarketChart,
        "coin_market_chart",
        Get,
        "coins/{id}/market_chart",
        ["vs_currency", "days"],
        &["interval", "precision"]
    ),
    endpoint!(
        CoinMarketChartRange,
        "coin_market_chart_range",
        Get,
        "coins/{id}/market_chart/range",
        ["vs_currency", "from", "to"],
        &["precision"]
    ),
    endpoint!(CoinStatusUpdates, "coin_status_updates", Get, "coins/{id}/status_updates", [], PAGINATION),
    endpoint!(CoinOhlc, "coin_ohlc", Get, "coins/{id}/ohlc", ["vs_currency", "days"], &["precision"]),
    // contract
    endpoint!(ContractCoin, "contract_coin", Get, "coins/{platform_id}/contract/{contract_address}", [], &[]),
    endpoint!(
        ContractMarketChart,
        "contract_market_chart",
        Get,
        "coins/{platform_id}/contract/{contract_address}/market_chart",
        ["vs_currency", "days"],
        &["precision"]
    ),
    endpoint!(
        ContractMarketChartRange,
        "contract_market_chart_range",
        Get,
        "coins/{platform_id}/contract/{contract_address}/market_chart/range",
        ["vs_currency", "from", "to"],
        &["precision"]
    ),
    // asset platforms / categories
    endpoint!(AssetPlatforms, "asset_platforms", Get, "asset_platforms", [], &["filter"]),
    endpoint!(CoinsCategoriesList, "coins_categories_list", Get, "coins/categories/list", [], &[]),
    endpoint!(CoinsCategories, "coins_categories", Get, "coins/categories", [], &["order"]),
    // exchanges
    endpoint!(Exchanges, "exchanges", Get, "exchanges", [], PAGINATION),
    endpoint!(ExchangesList, "exchanges_list", Get, "exchanges/list", [], &[]),
    endpoint!(Exchange, "exchange", Get, "exchanges/{id}", [], &[]),
    endpoint!(
        ExchangeTickers,
        "exchange_tickers",
        Get,
        "exchanges/{id}/tickers",
        [],
        &["coin_ids", "include_exchange_logo", "page", "depth", "order"]
    ),
    endpoint!(ExchangeStatusUpdates, "exchange_status_updates", Get, "exchanges/{id}/status_updates", [], PAGINATION),
    endpoint!(ExchangeVolumeChart, "exchange_volume_chart", Get, "exchanges/{id}/volume_chart", ["days"], &[]),
    // finance
    endpoint!(FinancePlatforms, "finance_platforms", Get, "finance_platforms", [], PAGINATION),
    endpoint!(
        FinanceProducts,
        "finance_products",
        Get,
        "finance_products",
        [],
        &["per_page", "page", "start_at", "end_at"]
    ),
    // indexes
    endpoint!(Indexes, "indexes", Get, "indexes", [], PAGINATION),
    endpoint!(Index, "index", Get, "indexes/{market_id}/{index_id}", [], &[]),
    endpoint!(IndexesList, "indexes_list", Get, "indexes/list", [], &[]),
    // derivatives
    endpoint!(Derivatives, "derivatives", Get, "derivatives", [], &["include_tickers"]),
    endpoint!(
        DerivativesExchanges,
        "derivatives_exchanges",
        Get,
        "derivatives/exchanges",
        [],
        &["order", "per_page", "page"]
    ),
    endpoint!(DerivativesExchange, "derivatives_exchange", Get, "derivatives/exchanges/{id}", [], &["include_tickers"]),
    endpoint!(DerivativesExchangesList, "derivatives_exchanges_list", Get, "derivatives/exchanges/list", [], &[]),
    // nfts
    endpoint!(NftsList, "nfts_list", Get, "nfts/list", [], &["order", "per_page", "page"]),
    endpoint!(Nft, "nft", Get, "nfts/{id}", [], &[]),
    // status updates / events
    endpoint!(
        StatusUpdates,
        "status_updates",
        Get,
        "status_updates",
        [],
        &["category", "project_type", "per_page", "page"]
    ),
    endpoint!(
        Events,
        "events",
        Get,
        "events",
        [],
        &["country_code", "type", "page", "upcoming_events_only", "from_date", "to_date"]
    ),
    endpoint!(EventsCountries, "events_countries", Get, "events/countries", [], &[]),
    endpoint!(EventsTypes, "events_types", Get, "events/types", [], &[]),
    // exchange rates / search / global
    endpoint!(ExchangeRates, "exchange_rates", Get, "exchange_rates", [], &[]),
    endpoint!(Search, "search", Get, "search", ["query"], &[]),
    endpoint!(SearchTrending, "search_trending", Get, "search/trending", [], &[]),
    endpoint!(Global, "global", Get, "global", [], &[]),
    endpoint!(GlobalDefi, "global_defi", Get, "global/decentralized_finance_defi", [], &[]),
    // companies (beta)
    endpoint!(
        CompaniesPublicTreasury,
        "companies_public_treasury",
        Get,
        "companies/public_treasury/{coin_id}",
        [],
        &[]
    ),
];

static BY_ENDPOINT: Lazy<HashMap<Endpoint, &'static EndpointSpec>> =
    Lazy::new(|| ENDPOINTS.iter().map(|spec| (spec.endpoint, spec)).collect());

static BY_NAME: Lazy<HashMap<&'static str, &'static EndpointSpec>> =
    Lazy::new(|| ENDPOINTS.iter().map(|spec| (spec.name, spec)).collect());

impl Endpoint {
    /// The table row for this endpoint.
    pub fn spec(self) -> Result<&'static EndpointSpec> {
        BY_ENDPOINT
            .get(&self)
            .copied()
            .ok_or_else(|| CoinGeckoError::UnknownEndpoint(format!("{:?}", self)))
    }
}

/// Finds a row by its method name, e.g. `"coin_market_chart"`.
pub fn lookup(name: &str) -> Result<&'static EndpointSpec> {
    BY_NAME
        .get(name)
        .copied()
        .ok_or_else(|| CoinGeckoError::UnknownEndpoint(name.to_string()))
}

impl EndpointSpec {
    /// Placeholder names in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
    }

    /// Fills the path template. Each returned item is one unencoded path segment.
    pub fn render_segments(&self, args: &[(&str, &str)]) -> Result<Vec<String>> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Some(placeholder) => args
                        .iter()
                        .find(|(name, _)| *name == placeholder)
                        .map(|(_, value)| value.trim())
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                        .ok_or_else(|| CoinGeckoError::MissingPathArgument {
                            endpoint: self.name,
                            placeholder: placeholder.to_string(),
                        }),
                    None => Ok(segment.to_string()),
                }
            })
            .collect()
    }

    /// Required parameters must be present and non-blank; undocumented ones are forwarded with
    /// a warning.
    pub fn check_params(&self, params: &QueryParams) -> Result<()> {
        let blank = |name: &str| params.get(name).map_or(true, |value| value.trim().is_empty());
        if let Some(missing) = self.required.iter().find(|name| blank(name)) {
            return Err(CoinGeckoError::MissingParameter {
                endpoint: self.name,
                parameter: *missing,
            });
        }
        for name in params.names() {
            let documented = self
                .required
                .iter()
                .chain(self.optional.iter())
                .any(|known| *known == name);
            if !documented {
                warn!(
                    "Parameter `{}` is not documented for {} ({}); forwarding as-is",
                    name, self.name, self.path
                );
            }
        }
        Ok(())
    }
}
