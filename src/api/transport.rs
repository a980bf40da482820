// src/api/transport.rs
//! HTTP transport seam.
//!
//! The session only needs "send this request, give me status + body". Keeping that behind
//! [`HttpTransport`] lets status classification and JSON decoding live in one place for every
//! transport, including the in-memory one used by the tests.

use crate::api::endpoints::HttpMethod;
use crate::config::Config;
use crate::error::{CoinGeckoError, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use url::Url;

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Raw response as received; the session interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request. Only transport-level failures are errors here; any HTTP status is
    /// returned as a response.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;

    /// Releases pooled connections. Called at most once, by the owning session.
    async fn close(&self);
}

/// Creates the transport a session owns for the duration of one open/close cycle.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(&self, config: &Config) -> Result<Arc<dyn HttpTransport>>;
}

/// reqwest-backed transport; the `Client` is the connection pool.
pub struct ReqwestTransport {
    client: RwLock<Option<Client>>,
}

impl ReqwestTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Wraps an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(client: Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.client.read().await.is_none()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        // Client is an Arc internally; clone it so the lock is not held across the request.
        let client = self.client.read().await.clone().ok_or_else(|| {
            CoinGeckoError::NoInitialisedSession("HTTP transport has been closed".to_string())
        })?;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let started = Instant::now();
        let mut builder = client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(
            "{} {} -> {} ({} bytes, {}ms)",
            request.method,
            request.url.path(),
            status.as_u16(),
            body.len(),
            started.elapsed().as_millis()
        );

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }

    async fn close(&self) {
        if self.client.write().await.take().is_some() {
            info!("Released CoinGecko HTTP connection pool");
        }
    }
}

/// Default connector: a fresh reqwest pool per session.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestConnector;

#[async_trait]
impl TransportConnector for ReqwestConnector {
    async fn connect(&self, config: &Config) -> Result<Arc<dyn HttpTransport>> {
        Ok(Arc::new(ReqwestTransport::new(config)?))
    }
}
