use mapreviews_core::ConfigError;
use thiserror::Error;

/// Failure to turn a successful HTTP body into a [`crate::RawPage`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Outcome of a single failed page request, as classified by the fetcher.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    NetworkTimeout { url: String },

    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: ParseError,
    },
}

impl TransportError {
    /// Returns `true` if the failure is expected to clear up on retry.
    ///
    /// Transient: timeouts, connection-level failures, HTTP 429 and 5xx.
    /// Everything else (other 4xx, malformed bodies) is permanent; malformed
    /// bodies get a single re-fetch from the retry controller instead.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::NetworkTimeout { .. } | TransportError::Network { .. } => true,
            TransportError::HttpStatus { status, .. } => *status == 429 || (500..600).contains(status),
            TransportError::MalformedResponse { .. } => false,
        }
    }

    /// Classifies a `reqwest` send/receive error for `url`.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::NetworkTimeout {
                url: url.to_owned(),
            };
        }
        if let Some(status) = err.status() {
            return TransportError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            };
        }
        TransportError::Network {
            url: url.to_owned(),
            source: err,
        }
    }
}

/// Errors that end a scrape session.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("page fetch failed permanently after {attempts} attempt(s): {last}")]
    PermanentFailure {
        attempts: u32,
        #[source]
        last: TransportError,
    },

    #[error("scrape cancelled")]
    Cancelled,
}
