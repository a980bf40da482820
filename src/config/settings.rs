use crate::error::{CoinGeckoError, Result};
use log::info;
use std::env;
use std::time::Duration;
use url::Url;

pub const PUBLIC_API_BASE_URL: &str = "https://api.coingecko.com/api/v3/";
pub const PRO_API_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3/";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_USER_AGENT: &str = concat!("coingecko-session/", env!("CARGO_PKG_VERSION"));

/// CoinGecko credential. The tier decides both the auth parameter name and the default host.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiKey {
    Demo(String),
    Pro(String),
}

impl ApiKey {
    pub fn value(&self) -> &str {
        match self {
            ApiKey::Demo(key) | ApiKey::Pro(key) => key,
        }
    }

    pub fn header_name(&self) -> &'static str {
        match self {
            ApiKey::Demo(_) => "x-cg-demo-api-key",
            ApiKey::Pro(_) => "x-cg-pro-api-key",
        }
    }

    pub fn query_name(&self) -> &'static str {
        match self {
            ApiKey::Demo(_) => "x_cg_demo_api_key",
            ApiKey::Pro(_) => "x_cg_pro_api_key",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ApiKey::Demo(_) => PUBLIC_API_BASE_URL,
            ApiKey::Pro(_) => PRO_API_BASE_URL,
        }
    }

    fn tier(&self) -> &'static str {
        match self {
            ApiKey::Demo(_) => "demo",
            ApiKey::Pro(_) => "pro",
        }
    }
}

// Never print the key itself.
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey::{}(<redacted>)", self.tier())
    }
}

/// Where the API key travels on each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPlacement {
    #[default]
    Header,
    Query,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<ApiKey>,
    /// Explicit base URL; falls back to the key tier's host when unset.
    pub api_base_url: Option<String>,
    pub key_placement: KeyPlacement,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: None,
            key_placement: KeyPlacement::Header,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Keyless access to the public API.
    pub fn public() -> Self {
        Self::default()
    }

    pub fn demo(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(ApiKey::Demo(key.into())),
            ..Self::default()
        }
    }

    pub fn pro(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(ApiKey::Pro(key.into())),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn with_key_placement(mut self, placement: KeyPlacement) -> Self {
        self.key_placement = placement;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any name -> value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // A pro key wins when both are present; validate() reports the conflict.
        let api_key = get("COINGECKO_PRO_API_KEY")
            .map(ApiKey::Pro)
            .or_else(|| get("COINGECKO_DEMO_API_KEY").map(ApiKey::Demo));

        Config {
            api_key,
            api_base_url: get("COINGECKO_API_BASE_URL"),
            key_placement: match get("COINGECKO_KEY_IN_QUERY")
                .and_then(|v| v.parse::<bool>().ok())
            {
                Some(true) => KeyPlacement::Query,
                _ => KeyPlacement::Header,
            },
            request_timeout_ms: get("COINGECKO_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            user_agent: get("COINGECKO_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Resolved base URL, always ending in `/` so relative routes join under it.
    pub fn base_url(&self) -> Result<Url> {
        let raw = match (&self.api_base_url, &self.api_key) {
            (Some(url), _) => url.as_str(),
            (None, Some(key)) => key.default_base_url(),
            (None, None) => PUBLIC_API_BASE_URL,
        };
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(CoinGeckoError::Config(format!(
                "API base URL {} cannot carry a path",
                raw
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.request_timeout_ms == 0 {
            return Err(CoinGeckoError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(key) = &self.api_key {
            if key.value().trim().is_empty() {
                return Err(CoinGeckoError::Config("API key is empty".to_string()));
            }
        }
        Ok(())
    }

    pub fn validate_and_log(&self) {
        info!("CoinGecko client configuration:");
        info!(
            "  base url: {}",
            self.base_url()
                .map(|u| u.to_string())
                .unwrap_or_else(|e| format!("<invalid: {}>", e))
        );
        info!(
            "  api key: {}",
            self.api_key
                .as_ref()
                .map(|k| format!("{} tier via {:?}", k.tier(), self.key_placement))
                .unwrap_or_else(|| "none".to_string())
        );
        info!("  timeout: {}ms", self.request_timeout_ms);
        info!("  user agent: {}", self.user_agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.key_placement, KeyPlacement::Header);
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.base_url().unwrap().as_str(), PUBLIC_API_BASE_URL);
    }

    #[test]
    fn test_demo_key_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("COINGECKO_DEMO_API_KEY", "CG-demo"),
            ("COINGECKO_TIMEOUT_MS", "1500"),
            ("COINGECKO_KEY_IN_QUERY", "true"),
        ]));
        assert_eq!(config.api_key, Some(ApiKey::Demo("CG-demo".to_string())));
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.key_placement, KeyPlacement::Query);
    }

    #[test]
    fn test_pro_key_switches_host() {
        let config = Config::from_lookup(lookup(&[
            ("COINGECKO_PRO_API_KEY", "CG-pro"),
            ("COINGECKO_DEMO_API_KEY", ""),
        ]));
        assert_eq!(config.api_key, Some(ApiKey::Pro("CG-pro".to_string())));
        assert_eq!(config.base_url().unwrap().as_str(), PRO_API_BASE_URL);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = Config::public().with_base_url("http://127.0.0.1:9000/api/v3");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://127.0.0.1:9000/api/v3/"
        );
    }

    #[test]
    fn test_validation() {
        assert!(Config::public().validate().is_ok());
        assert!(Config::public().with_base_url("not a url").validate().is_err());
        assert!(Config::demo("  ").validate().is_err());
        assert!(Config::public()
            .with_timeout(Duration::from_millis(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let printed = format!("{:?}", Config::demo("super-secret"));
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("redacted"));
    }
}
