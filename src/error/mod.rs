use thiserror::Error;

/// Boxed transport failure, kept intact so callers can downcast to the original error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CoinGeckoError {
    /// The session was never started, or has already been closed
    #[error("No initialised session: {0}")]
    NoInitialisedSession(String),

    /// A required query parameter was not supplied
    #[error("Missing parameter `{parameter}` for endpoint {endpoint}")]
    MissingParameter {
        endpoint: &'static str,
        parameter: &'static str,
    },

    /// A `{placeholder}` in the endpoint path was not supplied
    #[error("Missing path argument `{placeholder}` for endpoint {endpoint}")]
    MissingPathArgument {
        endpoint: &'static str,
        placeholder: String,
    },

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be sent or the connection failed
    #[error("Network Error: {0}")]
    Network(#[source] BoxError),

    /// The API answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// The body of a successful response was not valid JSON
    #[error("Unknown response: {source}")]
    UnknownResponse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Config Error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CoinGeckoError {
    fn from(err: reqwest::Error) -> Self {
        CoinGeckoError::Network(Box::new(err))
    }
}

impl CoinGeckoError {
    /// HTTP status code, when the API answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CoinGeckoError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for HTTP 429. The session never retries; this is a hint for the caller.
    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == Some(429)
    }

    /// Errors raised before anything was sent over the wire.
    pub fn is_usage_error(&self) -> bool {
        matches!(self.categorize(), ErrorCategory::Usage | ErrorCategory::Configuration)
    }

    pub fn categorize(&self) -> ErrorCategory {
        match self {
            CoinGeckoError::NoInitialisedSession(_) => ErrorCategory::Usage,
            CoinGeckoError::MissingParameter { .. } => ErrorCategory::Usage,
            CoinGeckoError::MissingPathArgument { .. } => ErrorCategory::Usage,
            CoinGeckoError::UnknownEndpoint(_) => ErrorCategory::Usage,
            CoinGeckoError::InvalidUrl(_) => ErrorCategory::Configuration,
            CoinGeckoError::Config(_) => ErrorCategory::Configuration,
            CoinGeckoError::Network(_) => ErrorCategory::Network,
            CoinGeckoError::Http { .. } => ErrorCategory::Http,
            CoinGeckoError::UnknownResponse { .. } => ErrorCategory::Decode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Configuration,
    Network,
    Http,
    Decode,
}

pub type Result<T> = std::result::Result<T, CoinGeckoError>;
