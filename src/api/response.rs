//! Response interpretation: decode the body and classify failures.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, ApiResult, ErrorResponse};

/// Header name prefixes reporting request weight and order counts.
const LIMIT_USAGE_PREFIXES: [&str; 3] = ["x-mbx-used-weight", "x-mbx-order-count", "x-sapi-used"];

/// Raw HTTP response as returned by a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are lowercase; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header (name is lowercased).
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Successful, decoded response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
    pub headers: BTreeMap<String, String>,
    /// Rate-limit usage headers, when the client was built with
    /// `show_limit_usage(true)`.
    pub limit_usage: Option<BTreeMap<String, String>>,
}

impl<T> ApiResponse<T> {
    /// Consume the response, keeping only the decoded body.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Interpret a raw response.
///
/// - 2xx: decode the body as `T`, or [`ApiError::MalformedResponse`].
/// - 429 / 418: [`ApiError::RateLimited`].
/// - other non-2xx with a `{code, msg}` body: [`ApiError::Exchange`].
/// - other non-2xx: [`ApiError::Http`].
pub fn interpret<T: DeserializeOwned>(
    raw: RawResponse,
    show_limit_usage: bool,
) -> ApiResult<ApiResponse<T>> {
    let status = raw.status;

    if (200..300).contains(&status) {
        let data = serde_json::from_slice::<T>(&raw.body).map_err(|e| {
            ApiError::MalformedResponse {
                status,
                message: format!("Failed to deserialize response: {}", e),
                body: raw.body_text(),
            }
        })?;
        let limit_usage = show_limit_usage.then(|| limit_usage(&raw.headers));
        return Ok(ApiResponse {
            status,
            data,
            headers: raw.headers,
            limit_usage,
        });
    }

    let body = raw.body_text();
    let business = serde_json::from_str::<ErrorResponse>(&body).ok();

    if status == 429 || status == 418 {
        let retry_after = raw
            .header("retry-after")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let (code, message) = match business {
            Some(err) => (Some(err.code), err.msg),
            None => (None, body),
        };
        return Err(ApiError::RateLimited {
            status,
            code,
            message,
            retry_after,
        });
    }

    match business {
        Some(err) => Err(ApiError::Exchange {
            status,
            code: err.code,
            message: err.msg,
        }),
        None => Err(ApiError::Http { status, body }),
    }
}

/// Select the rate-limit usage headers.
pub fn limit_usage(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| LIMIT_USAGE_PREFIXES.iter().any(|p| name.starts_with(p)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
