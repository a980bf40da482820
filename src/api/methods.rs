// src/api/methods.rs
//! One method per CoinGecko endpoint. Required parameters are arguments, optional ones are
//! `Option`s or option structs; everything is routed through [`CoinGeckoSession::call`].
//!
//! For a parameter a method does not expose (for example one CoinGecko documented later), call
//! the same row directly: `session.call(Endpoint::Exchange, &[("id", "binance")], params)`.
//! Parameters outside the table's documented set are still sent, with a warning.

use crate::api::endpoints::Endpoint;
use crate::api::options::{
    ChartOptions, CoinOptions, CoinTickersOptions, EventsOptions, ExchangeTickersOptions,
    FinanceProductsOptions, MarketsOptions, OrderedPagination, Pagination, PriceOptions,
    StatusUpdatesOptions,
};
use crate::api::params::{history_date, unix_seconds, Days, QueryParams};
use crate::api::session::CoinGeckoSession;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;
use serde_json::Value;

fn options<T: Serialize>(options: &T) -> Result<QueryParams> {
    QueryParams::from_serializable(options)
}

fn range<Tz: TimeZone>(vs_currency: &str, from: &DateTime<Tz>, to: &DateTime<Tz>) -> QueryParams {
    QueryParams::new()
        .with("vs_currency", vs_currency)
        .with("from", unix_seconds(from))
        .with("to", unix_seconds(to))
}

impl CoinGeckoSession {
    // ping

    /// Check API server status.
    pub async fn ping(&self) -> Result<Value> {
        self.call(Endpoint::Ping, &[], QueryParams::new()).await
    }

    /// Plan and usage of the configured key (paid tier).
    pub async fn api_key_usage(&self) -> Result<Value> {
        self.call(Endpoint::ApiKeyUsage, &[], QueryParams::new()).await
    }

    // simple

    /// Current price of coins in the given currencies, keyed by coin id then currency.
    pub async fn simple_price<S: AsRef<str>>(
        &self,
        ids: &[S],
        vs_currencies: &[S],
        opts: &PriceOptions,
    ) -> Result<Value> {
        let mut params = QueryParams::new()
            .with_list("ids", ids)
            .with_list("vs_currencies", vs_currencies);
        params.merge(options(opts)?);
        self.call(Endpoint::SimplePrice, &[], params).await
    }

    /// Current price of tokens on `platform_id`, looked up by contract address.
    pub async fn simple_token_price<S: AsRef<str>>(
        &self,
        platform_id: &str,
        contract_addresses: &[S],
        vs_currencies: &[S],
        opts: &PriceOptions,
    ) -> Result<Value> {
        let mut params = QueryParams::new()
            .with_list("contract_addresses", contract_addresses)
            .with_list("vs_currencies", vs_currencies);
        params.merge(options(opts)?);
        self.call(Endpoint::SimpleTokenPrice, &[("id", platform_id)], params)
            .await
    }

    pub async fn supported_vs_currencies(&self) -> Result<Value> {
        self.call(Endpoint::SupportedVsCurrencies, &[], QueryParams::new())
            .await
    }

    // coins

    /// Every supported coin's id, name and symbol.
    pub async fn coins_list(&self, include_platform: Option<bool>) -> Result<Value> {
        let params = QueryParams::new().with_opt("include_platform", include_platform);
        self.call(Endpoint::CoinsList, &[], params).await
    }

    /// Price, market cap, volume and related market data for many coins at once.
    pub async fn coins_markets(&self, vs_currency: &str, opts: &MarketsOptions) -> Result<Value> {
        let mut params = QueryParams::new().with("vs_currency", vs_currency);
        params.merge(options(opts)?);
        self.call(Endpoint::CoinsMarkets, &[], params).await
    }

    /// Current data for one coin, including exchange tickers unless disabled.
    pub async fn coin(&self, id: &str, opts: &CoinOptions) -> Result<Value> {
        self.call(Endpoint::Coin, &[("id", id)], options(opts)?).await
    }

    /// Coin tickers, paginated to 100 items.
    pub async fn coin_tickers(&self, id: &str, opts: &CoinTickersOptions) -> Result<Value> {
        self.call(Endpoint::CoinTickers, &[("id", id)], options(opts)?)
            .await
    }

    /// Snapshot of a coin at 00:00 UTC on `date`.
    pub async fn coin_history(
        &self,
        id: &str,
        date: NaiveDate,
        localization: Option<bool>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("date", history_date(date))
            .with_opt("localization", localization);
        self.call(Endpoint::CoinHistory, &[("id", id)], params).await
    }

    /// Price, market cap and volume history; granularity depends on `days`.
    pub async fn coin_market_chart(
        &self,
        id: &str,
        vs_currency: &str,
        days: Days,
        opts: &ChartOptions,
    ) -> Result<Value> {
        let mut params = QueryParams::new()
            .with("vs_currency", vs_currency)
            .with("days", days);
        params.merge(options(opts)?);
        self.call(Endpoint::CoinMarketChart, &[("id", id)], params)
            .await
    }

    pub async fn coin_market_chart_range<Tz: TimeZone>(
        &self,
        id: &str,
        vs_currency: &str,
        from: &DateTime<Tz>,
        to: &DateTime<Tz>,
        precision: Option<&str>,
    ) -> Result<Value> {
        let params = range(vs_currency, from, to).with_opt("precision", precision);
        self.call(Endpoint::CoinMarketChartRange, &[("id", id)], params)
            .await
    }

    pub async fn coin_status_updates(&self, id: &str, page: Pagination) -> Result<Value> {
        self.call(Endpoint::CoinStatusUpdates, &[("id", id)], options(&page)?)
            .await
    }

    /// `[timestamp, open, high, low, close]` candles.
    pub async fn coin_ohlc(
        &self,
        id: &str,
        vs_currency: &str,
        days: Days,
        precision: Option<&str>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("vs_currency", vs_currency)
            .with("days", days)
            .with_opt("precision", precision);
        self.call(Endpoint::CoinOhlc, &[("id", id)], params).await
    }

    // contract

    /// Coin data for a token contract on `platform_id`.
    pub async fn contract_coin(&self, platform_id: &str, contract_address: &str) -> Result<Value> {
        self.call(
            Endpoint::ContractCoin,
            &[("platform_id", platform_id), ("contract_address", contract_address)],
            QueryParams::new(),
        )
        .await
    }

    pub async fn contract_market_chart(
        &self,
        platform_id: &str,
        contract_address: &str,
        vs_currency: &str,
        days: Days,
        precision: Option<&str>,
    ) -> Result<Value> {
        let params = QueryParams::new()
            .with("vs_currency", vs_currency)
            .with("days", days)
            .with_opt("precision", precision);
        self.call(
            Endpoint::ContractMarketChart,
            &[("platform_id", platform_id), ("contract_address", contract_address)],
            params,
        )
        .await
    }

    pub async fn contract_market_chart_range<Tz: TimeZone>(
        &self,
        platform_id: &str,
        contract_address: &str,
        vs_currency: &str,
        from: &DateTime<Tz>,
        to: &DateTime<Tz>,
        precision: Option<&str>,
    ) -> Result<Value> {
        let params = range(vs_currency, from, to).with_opt("precision", precision);
        self.call(
            Endpoint::ContractMarketChartRange,
            &[("platform_id", platform_id), ("contract_address", contract_address)],
            params,
        )
        .await
    }

    // asset platforms / categories

    /// Blockchain networks; `filter = Some("nft")` narrows to NFT-capable ones.
    pub async fn asset_platforms(&self, filter: Option<&str>) -> Result<Value> {
        let params = QueryParams::new().with_opt("filter", filter);
        self.call(Endpoint::AssetPlatforms, &[], params).await
    }

    pub async fn coins_categories_list(&self) -> Result<Value> {
        self.call(Endpoint::CoinsCategoriesList, &[], QueryParams::new())
            .await
    }

    /// Categories with market data.
    pub async fn coins_categories(&self, order: Option<&str>) -> Result<Value> {
        let params = QueryParams::new().with_opt("order", order);
        self.call(Endpoint::CoinsCategories, &[], params).await
    }

    // exchanges

    pub async fn exchanges(&self, page: Pagination) -> Result<Value> {
        self.call(Endpoint::Exchanges, &[], options(&page)?).await
    }

    pub async fn exchanges_list(&self) -> Result<Value> {
        self.call(Endpoint::ExchangesList, &[], QueryParams::new())
            .await
    }

    /// Exchange volume in BTC and top tickers.
    pub async fn exchange(&self, id: &str) -> Result<Value> {
        self.call(Endpoint::Exchange, &[("id", id)], QueryParams::new())
            .await
    }

    /// Exchange tickers, 100 per page.
    pub async fn exchange_tickers(&self, id: &str, opts: &ExchangeTickersOptions) -> Result<Value> {
        self.call(Endpoint::ExchangeTickers, &[("id", id)], options(opts)?)
            .await
    }

    pub async fn exchange_status_updates(&self, id: &str, page: Pagination) -> Result<Value> {
        self.call(Endpoint::ExchangeStatusUpdates, &[("id", id)], options(&page)?)
            .await
    }

    pub async fn exchange_volume_chart(&self, id: &str, days: u32) -> Result<Value> {
        let params = QueryParams::new().with("days", days);
        self.call(Endpoint::ExchangeVolumeChart, &[("id", id)], params)
            .await
    }

    // finance

    pub async fn finance_platforms(&self, page: Pagination) -> Result<Value> {
        self.call(Endpoint::FinancePlatforms, &[], options(&page)?)
            .await
    }

    pub async fn finance_products(&self, opts: &FinanceProductsOptions) -> Result<Value> {
        self.call(Endpoint::FinanceProducts, &[], options(opts)?)
            .await
    }

    // indexes

    pub async fn indexes(&self, page: Pagination) -> Result<Value> {
        self.call(Endpoint::Indexes, &[], options(&page)?).await
    }

    pub async fn index(&self, market_id: &str, index_id: &str) -> Result<Value> {
        self.call(
            Endpoint::Index,
            &[("market_id", market_id), ("index_id", index_id)],
            QueryParams::new(),
        )
        .await
    }

    pub async fn indexes_list(&self) -> Result<Value> {
        self.call(Endpoint::IndexesList, &[], QueryParams::new())
            .await
    }

    // derivatives

    /// All derivative tickers. `include_tickers` is `all` or `unexpired`.
    pub async fn derivatives(&self, include_tickers: Option<&str>) -> Result<Value> {
        let params = QueryParams::new().with_opt("include_tickers", include_tickers);
        self.call(Endpoint::Derivatives, &[], params).await
    }

    pub async fn derivatives_exchanges(&self, opts: &OrderedPagination) -> Result<Value> {
        self.call(Endpoint::DerivativesExchanges, &[], options(opts)?)
            .await
    }

    pub async fn derivatives_exchange(&self, id: &str, include_tickers: Option<&str>) -> Result<Value> {
        let params = QueryParams::new().with_opt("include_tickers", include_tickers);
        self.call(Endpoint::DerivativesExchange, &[("id", id)], params)
            .await
    }

    pub async fn derivatives_exchanges_list(&self) -> Result<Value> {
        self.call(Endpoint::DerivativesExchangesList, &[], QueryParams::new())
            .await
    }

    // nfts

    pub async fn nfts_list(&self, opts: &OrderedPagination) -> Result<Value> {
        self.call(Endpoint::NftsList, &[], options(opts)?).await
    }

    pub async fn nft(&self, id: &str) -> Result<Value> {
        self.call(Endpoint::Nft, &[("id", id)], QueryParams::new())
            .await
    }

    // status updates / events

    pub async fn status_updates(&self, opts: &StatusUpdatesOptions) -> Result<Value> {
        self.call(Endpoint::StatusUpdates, &[], options(opts)?)
            .await
    }

    /// Events, paginated by 100.
    pub async fn events(&self, opts: &EventsOptions) -> Result<Value> {
        self.call(Endpoint::Events, &[], options(opts)?).await
    }

    pub async fn events_countries(&self) -> Result<Value> {
        self.call(Endpoint::EventsCountries, &[], QueryParams::new())
            .await
    }

    pub async fn events_types(&self) -> Result<Value> {
        self.call(Endpoint::EventsTypes, &[], QueryParams::new())
            .await
    }

    // exchange rates / search / global

    /// BTC-to-currency exchange rates.
    pub async fn exchange_rates(&self) -> Result<Value> {
        self.call(Endpoint::ExchangeRates, &[], QueryParams::new())
            .await
    }

    /// Coins, categories and markets matching `query`.
    pub async fn search(&self, query: &str) -> Result<Value> {
        let params = QueryParams::new().with("query", query);
        self.call(Endpoint::Search, &[], params).await
    }

    /// Trending coins in the last 24 hours, most popular first.
    pub async fn search_trending(&self) -> Result<Value> {
        self.call(Endpoint::SearchTrending, &[], QueryParams::new())
            .await
    }

    pub async fn global(&self) -> Result<Value> {
        self.call(Endpoint::Global, &[], QueryParams::new()).await
    }

    pub async fn global_defi(&self) -> Result<Value> {
        self.call(Endpoint::GlobalDefi, &[], QueryParams::new())
            .await
    }

    // companies (beta)

    /// Public companies' holdings of `coin_id` (`bitcoin` or `ethereum`).
    pub async fn companies_public_treasury(&self, coin_id: &str) -> Result<Value> {
        self.call(
            Endpoint::CompaniesPublicTreasury,
            &[("coin_id", coin_id)],
            QueryParams::new(),
        )
        .await
    }
}
