// src/api/mod.rs
//! CoinGecko API client
//!
//! - `session`: open/close lifecycle and request dispatch
//! - `endpoints`: the endpoint table every method is built on
//! - `methods`: one typed method per endpoint
//! - `params` / `options`: query parameter serialization
//! - `transport`: the HTTP seam and its reqwest implementation

pub mod endpoints;
pub mod methods;
pub mod options;
pub mod params;
pub mod session;
pub mod transport;

pub use endpoints::{lookup, Endpoint, EndpointSpec, HttpMethod, ENDPOINTS};
pub use options::{
    ChartOptions, CoinOptions, CoinTickersOptions, EventsOptions, ExchangeTickersOptions,
    FinanceProductsOptions, MarketsOptions, OrderedPagination, Pagination, PriceOptions,
    StatusUpdatesOptions,
};
pub use params::{Days, QueryParams};
pub use session::{CoinGeckoSession, SessionState};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, ReqwestConnector, ReqwestTransport, TransportConnector,
};
