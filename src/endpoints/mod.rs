//! Endpoint surface.
//!
//! Each endpoint is an [`Endpoint`] descriptor (verb, path, security and
//! required parameters). Typed methods on [`BinanceClient`](crate::api::BinanceClient)
//! take the required arguments positionally, then merge caller options, and
//! run through [`BinanceClient::call`](crate::api::BinanceClient::call).
//! Anything not listed here can be reached with a custom descriptor or the
//! client's `public_request` / `key_request` / `sign_request`.

pub mod broker;
pub mod market;
pub mod stream;
pub mod trade;

use crate::api::error::{ApiError, ApiResult};
use crate::api::params::Params;
use crate::api::request::{Method, RequestSpec, Security};

/// Static description of a REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub security: Security,
    /// Parameters that must be present and non-empty.
    pub required: &'static [&'static str],
}

impl Endpoint {
    pub const fn new(
        name: &'static str,
        method: Method,
        path: &'static str,
        security: Security,
        required: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            method,
            path,
            security,
            required,
        }
    }

    /// Check that every required parameter is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingArgument`] naming the first missing one.
    pub fn check(&self, params: &Params) -> ApiResult<()> {
        for name in self.required {
            match params.get(name) {
                Some(value) if !value.is_empty() => {}
                _ => return Err(ApiError::MissingArgument((*name).to_string())),
            }
        }
        Ok(())
    }

    /// Build the request spec for this endpoint.
    pub fn spec(&self, params: Params) -> RequestSpec {
        RequestSpec::new(self.method, self.path, params, self.security)
    }
}
