//! User data stream listen keys (API key only, no signature).

use serde_json::Value;

use crate::api::client::BinanceClient;
use crate::api::error::ApiResult;
use crate::api::params::Params;
use crate::api::request::{Method, Security};
use crate::api::response::ApiResponse;
use crate::endpoints::Endpoint;

pub const NEW_LISTEN_KEY: Endpoint = Endpoint::new(
    "new_listen_key",
    Method::Post,
    "/api/v3/userDataStream",
    Security::ApiKey,
    &[],
);

pub const RENEW_LISTEN_KEY: Endpoint = Endpoint::new(
    "renew_listen_key",
    Method::Put,
    "/api/v3/userDataStream",
    Security::ApiKey,
    &["listenKey"],
);

pub const CLOSE_LISTEN_KEY: Endpoint = Endpoint::new(
    "close_listen_key",
    Method::Delete,
    "/api/v3/userDataStream",
    Security::ApiKey,
    &["listenKey"],
);

impl BinanceClient {
    /// Start a user data stream. The response carries `listenKey`.
    pub async fn new_listen_key(&self) -> ApiResult<ApiResponse<Value>> {
        self.call(&NEW_LISTEN_KEY, Params::new()).await
    }

    /// Keep a user data stream alive for another 60 minutes.
    pub async fn renew_listen_key(&self, listen_key: &str) -> ApiResult<ApiResponse<Value>> {
        self.call(&RENEW_LISTEN_KEY, Params::new().with("listenKey", listen_key))
            .await
    }

    /// Close a user data stream.
    pub async fn close_listen_key(&self, listen_key: &str) -> ApiResult<ApiResponse<Value>> {
        self.call(&CLOSE_LISTEN_KEY, Params::new().with("listenKey", listen_key))
            .await
    }
}
