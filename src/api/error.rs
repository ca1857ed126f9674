//! API error types for the Binance REST client.

use std::time::Duration;

use thiserror::Error;

/// Transport-level failures: the request never produced an HTTP response.
///
/// No exchange-side state change can be assumed to have happened or not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection could not be established (refused, DNS, TLS).
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other failure while sending the request or reading the response.
    #[error("Request failed: {0}")]
    Request(String),

    /// The HTTP request could not be assembled. Nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error type for every call made through the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials, or a client that cannot be built.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A mandatory parameter was not supplied.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// A parameter or path was supplied but is malformed.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Network, timeout or TLS failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response without a decodable `{code, msg}` body.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Non-2xx response carrying an exchange business error.
    #[error("Exchange error {code} (HTTP {status}): {message}")]
    Exchange {
        status: u16,
        code: i64,
        message: String,
    },

    /// Request weight or order rate limit exceeded (429), or IP banned (418).
    #[error("Rate limited (HTTP {status}, retry after {retry_after:?}): {message}")]
    RateLimited {
        status: u16,
        code: Option<i64>,
        message: String,
        retry_after: Option<Duration>,
    },

    /// 2xx response whose body failed to decode.
    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse {
        status: u16,
        message: String,
        body: String,
    },
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Coarse classification of an [`ApiError`], for caller-side branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    CallerContract,
    Timeout,
    Transport,
    Http,
    Exchange,
    RateLimited,
    MalformedResponse,
}

impl ApiError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Configuration(_) => ErrorKind::Configuration,
            ApiError::MissingArgument(_) | ApiError::InvalidParameter(_) => {
                ErrorKind::CallerContract
            }
            ApiError::Transport(TransportError::Timeout) => ErrorKind::Timeout,
            ApiError::Transport(TransportError::InvalidRequest(_)) => ErrorKind::Configuration,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Exchange { .. } => ErrorKind::Exchange,
            ApiError::RateLimited { .. } => ErrorKind::RateLimited,
            ApiError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. }
            | ApiError::Exchange { status, .. }
            | ApiError::RateLimited { status, .. }
            | ApiError::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Exchange business error code, if the response carried one.
    pub fn exchange_code(&self) -> Option<i64> {
        match self {
            ApiError::Exchange { code, .. } => Some(*code),
            ApiError::RateLimited { code, .. } => *code,
            _ => None,
        }
    }

    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

/// Business error body returned by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ErrorResponse {
    /// Exchange error code (negative for most request errors)
    pub code: i64,
    /// Human-readable error message
    #[serde(default)]
    pub msg: String,
}
