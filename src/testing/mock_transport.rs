//! In-memory transport for exercising sessions without a network.
//!
//! Replies are registered per route (the path below the API base, e.g. `coins/bitcoin/ohlc`)
//! and are reused for every matching request. Every request, connect and close is recorded.

use crate::api::transport::{ApiRequest, ApiResponse, HttpTransport, TransportConnector};
use crate::config::Config;
use crate::error::{CoinGeckoError, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockReply {
    Response(ApiResponse),
    NetworkFailure(String),
}

#[derive(Default)]
struct MockState {
    routes: Vec<(String, MockReply)>,
    fallback: Option<MockReply>,
    requests: Vec<ApiRequest>,
    connects: usize,
    closes: usize,
    latency: Option<Duration>,
}

/// Acts as both the connector and the transport it hands out; clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded requests from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn register(&self, route: &str, reply: MockReply) {
        let route = route.trim_matches('/').to_string();
        let mut state = self.state();
        state.routes.retain(|(r, _)| *r != route);
        state.routes.push((route, reply));
    }

    pub fn respond(&self, route: &str, response: ApiResponse) {
        self.register(route, MockReply::Response(response));
    }

    /// 200 OK with `body` serialized as JSON.
    pub fn respond_json(&self, route: &str, body: Value) {
        self.respond(route, json_response(&body));
    }

    /// Non-success status with an error body.
    pub fn respond_status(&self, route: &str, status: u16, reason: &str) {
        let body = serde_json::json!({ "status": { "error_code": status, "error_message": reason } });
        self.respond(
            route,
            ApiResponse {
                status,
                reason: reason.to_string(),
                body: body.to_string().into_bytes(),
            },
        );
    }

    /// 200 OK with an arbitrary, possibly non-JSON, body.
    pub fn respond_raw(&self, route: &str, body: &str) {
        self.respond(
            route,
            ApiResponse {
                status: 200,
                reason: "OK".to_string(),
                body: body.as_bytes().to_vec(),
            },
        );
    }

    /// Fails requests to `route` as if the connection had been reset.
    pub fn fail_network(&self, route: &str, message: &str) {
        self.register(route, MockReply::NetworkFailure(message.to_string()));
    }

    /// Reply for routes without a registration. Unset means 404.
    pub fn respond_default(&self, body: Value) {
        self.state().fallback = Some(MockReply::Response(json_response(&body)));
    }

    /// Delays every reply, so concurrent calls overlap.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = Some(latency);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn connect_count(&self) -> usize {
        self.state().connects
    }

    pub fn close_count(&self) -> usize {
        self.state().closes
    }

    fn reply_for(&self, request: &ApiRequest) -> (Option<MockReply>, Option<Duration>) {
        let mut state = self.state();
        state.requests.push(request.clone());

        let path = request.url.path().trim_end_matches('/');
        let reply = state
            .routes
            .iter()
            .filter(|(route, _)| path.ends_with(&format!("/{}", route)))
            .max_by_key(|(route, _)| route.len())
            .map(|(_, reply)| reply.clone())
            .or_else(|| state.fallback.clone());
        (reply, state.latency)
    }
}

fn json_response(body: &Value) -> ApiResponse {
    ApiResponse {
        status: 200,
        reason: "OK".to_string(),
        body: body.to_string().into_bytes(),
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let (reply, latency) = self.reply_for(&request);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        debug!("mock {} {}", request.method, request.url.path());

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::NetworkFailure(message)) => Err(CoinGeckoError::Network(Box::new(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, message),
            ))),
            None => Ok(ApiResponse {
                status: 404,
                reason: "Not Found".to_string(),
                body: br#"{"error":"Not Found"}"#.to_vec(),
            }),
        }
    }

    async fn close(&self) {
        self.state().closes += 1;
    }
}

#[async_trait]
impl TransportConnector for MockTransport {
    async fn connect(&self, _config: &Config) -> Result<Arc<dyn HttpTransport>> {
        self.state().connects += 1;
        Ok(Arc::new(self.clone()))
    }
}
