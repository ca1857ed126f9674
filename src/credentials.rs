//! API credentials.
//!
//! Credentials are created once when the client is built and shared
//! read-only for the client's lifetime. The secret is held as raw bytes and
//! never printed: `Debug` redacts it and there is no `Display` or
//! `Serialize` implementation.

use std::fmt;

use crate::api::error::ApiResult;
use crate::api::signer;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";

/// Environment variable holding the API secret.
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// API key and secret used to authenticate requests.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: Box<[u8]>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials from an API key and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into().into_bytes().into_boxed_slice(),
        }
    }

    /// Credentials with a key only, for endpoints that need the key header
    /// but no signature. Signing with these fails with a configuration error.
    pub fn key_only(api_key: impl Into<String>) -> Self {
        Self::new(api_key, String::new())
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Whether a secret is available for signing.
    pub fn has_secret(&self) -> bool {
        !self.api_secret.is_empty()
    }

    /// Sign a canonical query string with the secret.
    pub fn sign(&self, payload: &str) -> ApiResult<String> {
        signer::sign(&self.api_secret, payload)
    }
}
