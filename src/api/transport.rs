//! Transport dispatch: send a prepared request and return the raw response.
//!
//! [`Transport`] is the seam between request building and network I/O.
//! [`HttpTransport`] is the reqwest implementation; tests and alternative
//! runtimes can plug in their own.
//!
//! Transports never retry. Dropping the future returned by
//! [`Transport::dispatch`] cancels the in-flight call and releases its
//! connection.

use async_trait::async_trait;

use crate::api::error::TransportError;
use crate::api::request::PreparedRequest;
use crate::api::response::RawResponse;

/// Executes prepared requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response, or a transport failure.
    async fn dispatch(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
    use reqwest::Client;

    use super::Transport;
    use crate::api::client::ClientConfig;
    use crate::api::error::{ApiError, ApiResult, TransportError};
    use crate::api::request::{Method, PreparedRequest};
    use crate::api::response::RawResponse;

    /// Idle connections kept per host.
    const POOL_MAX_IDLE_PER_HOST: usize = 10;

    /// reqwest-backed transport with connection pooling, timeout and proxy.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
    }

    impl HttpTransport {
        /// Build a transport from client configuration.
        ///
        /// # Errors
        ///
        /// Returns [`ApiError::Configuration`] for an invalid proxy URL or
        /// header, or if the HTTP client cannot be initialized.
        pub fn new(config: &ClientConfig) -> ApiResult<Self> {
            let mut headers = HeaderMap::new();
            let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
                ApiError::Configuration(format!("Invalid user agent: {}", e))
            })?;
            headers.insert(USER_AGENT, user_agent);

            for (name, value) in &config.default_headers {
                let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                    ApiError::Configuration(format!("Invalid header name '{}': {}", name, e))
                })?;
                let header_value = HeaderValue::from_str(value).map_err(|e| {
                    ApiError::Configuration(format!("Invalid header value for '{}': {}", name, e))
                })?;
                headers.insert(header_name, header_value);
            }

            let mut builder = Client::builder()
                .timeout(config.timeout)
                .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
                .default_headers(headers);

            if let Some(proxy_url) = &config.proxy_url {
                let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| {
                    ApiError::Configuration(format!("Invalid proxy URL '{}': {}", proxy_url, e))
                })?;
                builder = builder.proxy(proxy);
            } else {
                // Only an explicitly configured proxy is used.
                builder = builder.no_proxy();
            }

            let client = builder.build().map_err(|e| {
                ApiError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

            Ok(Self { client })
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn dispatch(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut req = self.client.request(method, &request.url);
            for (name, value) in &request.headers {
                req = req.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                req = req.body(body);
            }

            let resp = req.send().await.map_err(classify)?;
            let status = resp.status().as_u16();

            let mut headers: BTreeMap<String, String> = BTreeMap::new();
            for (name, value) in resp.headers() {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                headers
                    .entry(name.as_str().to_string())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(&value);
                    })
                    .or_insert(value);
            }

            let body = resp.bytes().await.map_err(classify)?.to_vec();

            Ok(RawResponse {
                status,
                headers,
                body,
            })
        }
    }

    /// Map a reqwest failure onto the transport error taxonomy.
    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }

}
