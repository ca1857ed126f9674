//! Request building: timestamping, signing and URL/body placement.
//!
//! [`build`] turns a [`RequestSpec`] into a [`PreparedRequest`] without any
//! I/O. For signed requests the canonical query string is encoded once,
//! signed, and `signature` is appended last; the result is transmitted as-is
//! (URL query for GET/DELETE, form body for POST/PUT).

use std::fmt;

use chrono::Utc;

use crate::api::client::ClientConfig;
use crate::api::error::{ApiError, ApiResult};
use crate::api::params::{Params, SIGNATURE, TIMESTAMP};
use crate::credentials::Credentials;
use crate::network::API_KEY_HEADER;

/// Content type used for POST/PUT payloads.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the request body rather than the URL.
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    /// Whether the request may be safely repeated.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication required by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Security {
    /// Public endpoint: no key, no signature.
    None,
    /// API key header required, no signature (e.g. user data streams).
    ApiKey,
    /// API key header plus `timestamp` and HMAC `signature`.
    Signed,
}

/// A logical request: verb, path, parameters and authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub params: Params,
    pub security: Security,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>, params: Params, security: Security) -> Self {
        Self {
            method,
            path: path.into(),
            params,
            security,
        }
    }

    /// Whether the request needs a signature.
    pub fn requires_signature(&self) -> bool {
        self.security == Security::Signed
    }
}

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    /// Full URL; includes the query string for GET/DELETE.
    pub url: String,
    /// Canonical parameter string as transmitted, including `signature`.
    pub payload: String,
    /// Request body for POST/PUT.
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl PreparedRequest {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The transmitted `signature` value, if the request is signed.
    pub fn signature(&self) -> Option<&str> {
        self.split_signature().map(|(_, sig)| sig)
    }

    /// The part of the payload covered by the signature.
    pub fn signed_payload(&self) -> Option<&str> {
        self.split_signature().map(|(signed, _)| signed)
    }

    fn split_signature(&self) -> Option<(&str, &str)> {
        let marker = format!("{}=", SIGNATURE);
        if let Some(sig) = self.payload.strip_prefix(marker.as_str()) {
            return Some(("", sig));
        }
        let marker = format!("&{}=", SIGNATURE);
        let idx = self.payload.rfind(marker.as_str())?;
        Some((&self.payload[..idx], &self.payload[idx + marker.len()..]))
    }
}

/// Current wall-clock time in milliseconds since the UNIX epoch.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build a request. Performs no I/O.
///
/// # Errors
///
/// - [`ApiError::InvalidParameter`] for a malformed path or parameter values.
/// - [`ApiError::Configuration`] if the endpoint needs credentials that are
///   missing, or a signature is required and no secret is configured.
pub fn build(
    spec: &RequestSpec,
    credentials: Option<&Credentials>,
    config: &ClientConfig,
) -> ApiResult<PreparedRequest> {
    validate_path(&spec.path)?;
    spec.params.validate()?;

    let mut headers = Vec::new();
    let api_key = credentials
        .map(Credentials::api_key)
        .filter(|key| !key.is_empty());

    let payload = match spec.security {
        Security::None => spec.params.encode(),
        Security::ApiKey => {
            if api_key.is_none() {
                return Err(ApiError::Configuration(format!(
                    "{} {} requires an API key",
                    spec.method, spec.path
                )));
            }
            spec.params.encode()
        }
        Security::Signed => {
            let creds = match (credentials, api_key) {
                (Some(creds), Some(_)) if creds.has_secret() => creds,
                _ => {
                    return Err(ApiError::Configuration(format!(
                        "{} {} is signed and requires an API key and secret",
                        spec.method, spec.path
                    )))
                }
            };

            if spec.params.contains(SIGNATURE) {
                return Err(ApiError::InvalidParameter(format!(
                    "{} is computed by the client and cannot be supplied",
                    SIGNATURE
                )));
            }

            let mut params = spec.params.clone();
            if !params.contains(TIMESTAMP) {
                params.push(TIMESTAMP, current_timestamp_ms());
            }

            let mut query = params.encode();
            let signature = creds.sign(&query)?;
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(SIGNATURE);
            query.push('=');
            query.push_str(&signature);
            query
        }
    };

    if let Some(key) = api_key {
        check_header_value(API_KEY_HEADER, key)?;
        headers.push((API_KEY_HEADER.to_string(), key.to_string()));
    }

    let mut url = format!("{}{}", config.base_url, spec.path);
    let body = if spec.method.carries_body() {
        headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
        Some(payload.clone())
    } else {
        if !payload.is_empty() {
            url.push('?');
            url.push_str(&payload);
        }
        None
    };

    Ok(PreparedRequest {
        method: spec.method,
        url,
        payload,
        body,
        headers,
    })
}

/// Reject header values the HTTP layer would refuse (control characters).
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] naming the header.
pub fn check_header_value(name: &str, value: &str) -> ApiResult<()> {
    if value.bytes().any(|b| (b < 0x20 && b != b'\t') || b == 0x7f) {
        return Err(ApiError::Configuration(format!(
            "{} contains characters not allowed in an HTTP header",
            name
        )));
    }
    Ok(())
}

/// Reject paths that cannot be resolved against the base URL.
fn validate_path(path: &str) -> ApiResult<()> {
    if path.is_empty() || !path.starts_with('/') {
        return Err(ApiError::InvalidParameter(format!(
            "path must start with '/': {:?}",
            path
        )));
    }
    if path.contains('?') {
        return Err(ApiError::InvalidParameter(format!(
            "path must not carry a query string: {}",
            path
        )));
    }
    if let (Some(open), Some(close)) = (path.find('{'), path.find('}')) {
        if open < close {
            return Err(ApiError::InvalidParameter(format!(
                "unresolved path parameter {} in {}",
                &path[open..=close],
                path
            )));
        }
    }
    Ok(())
}
