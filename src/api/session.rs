// src/api/session.rs
//! CoinGecko API session.
//!
//! A session moves through `Unopened -> Open -> Closed`. Opening it acquires an HTTP
//! connection pool (through a [`TransportConnector`]) or adopts a caller-managed transport;
//! closing it releases an owned pool exactly once. [`CoinGeckoSession::scope`] does both around
//! a block of calls so the pool is released on every exit path.

use crate::api::endpoints::{Endpoint, HttpMethod};
use crate::api::params::QueryParams;
use crate::api::transport::{
    ApiRequest, ApiResponse, HttpTransport, ReqwestConnector, ReqwestTransport, TransportConnector,
};
use crate::config::{Config, KeyPlacement};
use crate::error::{CoinGeckoError, Result};
use futures::future::BoxFuture;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

enum TransportSource {
    /// The session creates the pool on `start` and releases it on `close`.
    Owned(Arc<dyn TransportConnector>),
    /// Managed by the caller; never closed by the session.
    Shared(Arc<dyn HttpTransport>),
}

struct Active {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
}

pub struct CoinGeckoSession {
    config: Config,
    source: TransportSource,
    active: Option<Active>,
    state: SessionState,
}

impl CoinGeckoSession {
    /// Session that owns a reqwest connection pool built from `config`.
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, Arc::new(ReqwestConnector))
    }

    pub fn with_connector(config: Config, connector: Arc<dyn TransportConnector>) -> Self {
        Self {
            config,
            source: TransportSource::Owned(connector),
            active: None,
            state: SessionState::Unopened,
        }
    }

    /// Session over a transport the caller keeps managing; `close` leaves it untouched.
    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            source: TransportSource::Shared(transport),
            active: None,
            state: SessionState::Unopened,
        }
    }

    /// Session over an existing reqwest client, e.g. one shared across an application.
    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::from_client(client)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn owns_transport(&self) -> bool {
        matches!(self.source, TransportSource::Owned(_))
    }

    /// Opens the session. A no-op when already open; a closed session cannot be reopened.
    pub async fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Open => return Ok(()),
            SessionState::Closed => {
                return Err(CoinGeckoError::NoInitialisedSession(
                    "the CoinGeckoSession has been closed and cannot be reopened; create a new one"
                        .to_string(),
                ))
            }
            SessionState::Unopened => {}
        }

        self.config.validate()?;
        let base_url = self.config.base_url()?;
        let transport = match &self.source {
            TransportSource::Owned(connector) => connector.connect(&self.config).await?,
            TransportSource::Shared(transport) => transport.clone(),
        };

        info!(
            "Opened CoinGecko session on {} ({} transport)",
            base_url,
            if self.owns_transport() { "owned" } else { "shared" }
        );
        self.active = Some(Active {
            transport,
            base_url,
        });
        self.state = SessionState::Open;
        Ok(())
    }

    /// Closes the session, releasing an owned pool. Later calls are no-ops.
    pub async fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        let Some(active) = self.active.take() else {
            return;
        };
        if previous != SessionState::Open {
            return;
        }
        if self.owns_transport() {
            active.transport.close().await;
        }
        info!("Closed CoinGecko session");
    }

    /// Opens the session, runs `f`, then closes the session whatever `f` returned.
    ///
    /// ```no_run
    /// # use coingecko_session::{CoinGeckoSession, Config, CoinGeckoError};
    /// # use futures::FutureExt;
    /// # async fn demo() -> Result<(), CoinGeckoError> {
    /// let pong = CoinGeckoSession::new(Config::public())
    ///     .scope(|session| async move { session.ping().await }.boxed())
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub async fn scope<T, E, F>(mut self, f: F) -> std::result::Result<T, E>
    where
        E: From<CoinGeckoError>,
        F: for<'s> FnOnce(&'s CoinGeckoSession) -> BoxFuture<'s, std::result::Result<T, E>>,
    {
        self.start().await?;
        let outcome = f(&self).await;
        self.close().await;
        outcome
    }

    fn active(&self) -> Result<&Active> {
        match (self.state, &self.active) {
            (SessionState::Open, Some(active)) => Ok(active),
            (state, _) => Err(CoinGeckoError::NoInitialisedSession(format!(
                "the CoinGeckoSession is {:?}; call start() or use scope() before making requests",
                state
            ))),
        }
    }

    /// Calls a table endpoint and returns the decoded body as-is.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        path_args: &[(&str, &str)],
        params: QueryParams,
    ) -> Result<Value> {
        let active = self.active()?;
        let spec = endpoint.spec()?;
        spec.check_params(&params)?;
        let segments = spec.render_segments(path_args)?;
        self.send(active, spec.method, &segments, params).await
    }

    /// Like [`call`](Self::call), deserializing the body into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path_args: &[(&str, &str)],
        params: QueryParams,
    ) -> Result<T> {
        let value = self.call(endpoint, path_args, params).await?;
        let body = value.to_string();
        serde_json::from_value(value).map_err(|source| CoinGeckoError::UnknownResponse { source, body })
    }

    /// Sends a request to any route under the base URL, bypassing the endpoint table.
    ///
    /// A query string in `route` is decoded and sent along with `params`; `params` wins when
    /// both name the same parameter.
    pub async fn request(&self, method: HttpMethod, route: &str, params: QueryParams) -> Result<Value> {
        let active = self.active()?;
        let (path, query) = route.split_once('?').unwrap_or((route, ""));
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut merged: QueryParams = url::form_urlencoded::parse(query.as_bytes()).collect();
        merged.merge(params);
        self.send(active, method, &segments, merged).await
    }

    fn build_request(
        &self,
        active: &Active,
        method: HttpMethod,
        segments: &[String],
        mut params: QueryParams,
    ) -> Result<ApiRequest> {
        let mut url = active.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CoinGeckoError::Config(format!("API base URL {} cannot carry a path", active.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if let Some(key) = &self.config.api_key {
            match self.config.key_placement {
                KeyPlacement::Header => {
                    headers.push((key.header_name().to_string(), key.value().to_string()))
                }
                KeyPlacement::Query => {
                    params.set(key.query_name(), key.value());
                }
            }
        }

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
        })
    }

    async fn send(
        &self,
        active: &Active,
        method: HttpMethod,
        segments: &[String],
        params: QueryParams,
    ) -> Result<Value> {
        let request = self.build_request(active, method, segments, params)?;
        // The query may carry the API key; only the path is logged.
        debug!("{} {}", method, request.url.path());

        let response = active.transport.execute(request).await?;
        decode(response)
    }
}

fn decode(response: ApiResponse) -> Result<Value> {
    if !response.is_success() {
        warn!("CoinGecko API returned HTTP {} {}", response.status, response.reason);
        return Err(CoinGeckoError::Http {
            status: response.status,
            reason: response.reason,
        });
    }
    serde_json::from_slice(&response.body).map_err(|source| CoinGeckoError::UnknownResponse {
        source,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}

impl Drop for CoinGeckoSession {
    fn drop(&mut self) {
        if self.state != SessionState::Open || !self.owns_transport() {
            return;
        }
        let Some(active) = self.active.take() else {
            return;
        };
        // Dropped without close(), e.g. a cancelled scope: release on the runtime if there is one.
        warn!("CoinGeckoSession dropped while open; releasing its connection pool");
        self.state = SessionState::Closed;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move { active.transport.close().await });
        }
    }
}
