//! Binance REST API client implementation.
//!
//! The [`BinanceClient`] owns the read-only configuration and credentials and
//! runs every call through the same pipeline:
//! build (timestamp + signature) → dispatch → interpret.
//!
//! # Example
//!
//! ```rust,ignore
//! use binance_connector::api::{BinanceClient, Method, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BinanceClient::builder()
//!         .api_key("key")
//!         .api_secret("secret")
//!         .show_limit_usage(true)
//!         .build()?;
//!
//!     let account = client
//!         .sign_request(Method::Get, "/api/v3/account", Params::new())
//!         .await?;
//!     println!("{}", account.data);
//!
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::params::Params;
use crate::api::request::{self, Method, PreparedRequest, RequestSpec, Security};
use crate::api::response::{self, ApiResponse};
use crate::api::retry::RetryPolicy;
use crate::api::transport::Transport;
use crate::credentials::{Credentials, API_KEY_ENV, API_SECRET_ENV};
use crate::endpoints::Endpoint;
use crate::network::{API_KEY_HEADER, DEFAULT_API_URL, DEFAULT_USER_AGENT};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "BINANCE_BASE_URL";

/// Client configuration. Read-only once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Proxy for all requests.
    pub proxy_url: Option<String>,
    /// Surface rate-limit usage headers in [`ApiResponse::limit_usage`].
    pub show_limit_usage: bool,
    /// Retry policy for GET requests.
    pub retry: RetryPolicy,
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy_url: None,
            show_limit_usage: false,
            retry: RetryPolicy::None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}

/// Builder for configuring [`BinanceClient`].
#[derive(Clone, Default)]
pub struct BinanceClientBuilder {
    config: ClientConfig,
    api_key: Option<String>,
    api_secret: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for BinanceClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceClientBuilder")
            .field("config", &self.config)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl BinanceClientBuilder {
    /// Create a new builder targeting [`DEFAULT_API_URL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from `BINANCE_API_KEY`, `BINANCE_API_SECRET` and
    /// `BINANCE_BASE_URL`. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        builder.api_key = std::env::var(API_KEY_ENV).ok();
        builder.api_secret = std::env::var(API_SECRET_ENV).ok();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(url);
        }
        builder
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API secret used for signing.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Override the base URL (testnet, futures, alternate regions).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    /// Route all requests through a proxy.
    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(proxy_url.into());
        self
    }

    /// Report rate-limit usage headers with every successful response.
    pub fn show_limit_usage(mut self, enabled: bool) -> Self {
        self.config.show_limit_usage = enabled;
        self
    }

    /// Retry GET requests according to `policy`. Other verbs never retry.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Use a custom transport instead of the default HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if a secret is given without a
    /// key, the key is not a valid header value, or the transport cannot be
    /// initialized.
    pub fn build(self) -> ApiResult<BinanceClient> {
        let credentials = match (self.api_key, self.api_secret) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            (Some(key), None) => Some(Credentials::key_only(key)),
            (None, Some(_)) => {
                return Err(ApiError::Configuration(
                    "API secret provided without an API key".to_string(),
                ))
            }
            (None, None) => None,
        };
        if let Some(creds) = &credentials {
            request::check_header_value(API_KEY_HEADER, creds.api_key())?;
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(&self.config)?,
        };

        Ok(BinanceClient {
            config: Arc::new(self.config),
            credentials: credentials.map(Arc::new),
            transport,
        })
    }
}

#[cfg(feature = "http")]
fn default_transport(config: &ClientConfig) -> ApiResult<Arc<dyn Transport>> {
    Ok(Arc::new(crate::api::transport::HttpTransport::new(config)?))
}

#[cfg(not(feature = "http"))]
fn default_transport(_config: &ClientConfig) -> ApiResult<Arc<dyn Transport>> {
    Err(ApiError::Configuration(
        "no transport configured; enable the `http` feature or supply one".to_string(),
    ))
}

/// Binance REST API client.
///
/// Cheap to clone; clones share configuration, credentials and the
/// connection pool.
#[derive(Clone)]
pub struct BinanceClient {
    config: Arc<ClientConfig>,
    credentials: Option<Arc<Credentials>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl BinanceClient {
    /// Create a client with credentials and default settings.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> ApiResult<Self> {
        BinanceClientBuilder::new()
            .api_key(api_key)
            .api_secret(api_secret)
            .build()
    }

    /// Create a client for public endpoints only.
    pub fn public() -> ApiResult<Self> {
        BinanceClientBuilder::new().build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder() -> BinanceClientBuilder {
        BinanceClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_deref()
    }

    // =========================================================================
    // Engine
    // =========================================================================

    /// Build a request without sending it.
    pub fn prepare(&self, spec: &RequestSpec) -> ApiResult<PreparedRequest> {
        request::build(spec, self.credentials(), &self.config)
    }

    /// Send a request, applying the retry policy for GET requests.
    pub async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiResult<ApiResponse<T>> {
        let retry = if spec.method.is_idempotent() {
            self.config.retry.config()
        } else {
            None
        };
        let Some(retry) = retry else {
            return self.execute(&spec).await;
        };

        let mut attempt = 0;
        loop {
            match self.execute(&spec).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < retry.max_retries && retry.should_retry(&e) => {
                    let delay = retry.delay_for_attempt(attempt, &e);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        path = %spec.path,
                        "Retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One build → dispatch → interpret pass. The request is rebuilt on
    /// every call, so a signed retry carries a fresh timestamp.
    async fn execute<T: DeserializeOwned>(&self, spec: &RequestSpec) -> ApiResult<ApiResponse<T>> {
        let request = self.prepare(spec)?;
        tracing::debug!(
            method = %spec.method,
            path = %spec.path,
            security = ?spec.security,
            "Dispatching request"
        );
        let raw = self.transport.dispatch(request).await?;
        tracing::trace!(status = raw.status, bytes = raw.body.len(), "Received response");
        response::interpret(raw, self.config.show_limit_usage)
    }

    /// Call a public endpoint.
    pub async fn public_request(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        self.send(RequestSpec::new(method, path, params, Security::None))
            .await
    }

    /// Call an endpoint that needs the API key header but no signature.
    pub async fn key_request(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        self.send(RequestSpec::new(method, path, params, Security::ApiKey))
            .await
    }

    /// Call a signed endpoint.
    pub async fn sign_request(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        self.send(RequestSpec::new(method, path, params, Security::Signed))
            .await
    }

    /// Call a described endpoint after checking its required parameters.
    pub async fn call(&self, endpoint: &Endpoint, params: Params) -> ApiResult<ApiResponse<Value>> {
        self.call_as(endpoint, params).await
    }

    /// Like [`call`](Self::call), decoding the body as `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: Params,
    ) -> ApiResult<ApiResponse<T>> {
        endpoint.check(&params)?;
        self.send(endpoint.spec(params)).await
    }
}
