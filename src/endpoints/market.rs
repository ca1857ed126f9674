//! Spot market data endpoints (public).

use serde_json::Value;

use crate::api::client::BinanceClient;
use crate::api::error::ApiResult;
use crate::api::params::Params;
use crate::api::request::{Method, Security};
use crate::api::response::ApiResponse;
use crate::endpoints::Endpoint;

pub const PING: Endpoint = Endpoint::new("ping", Method::Get, "/api/v3/ping", Security::None, &[]);

pub const TIME: Endpoint = Endpoint::new("time", Method::Get, "/api/v3/time", Security::None, &[]);

pub const EXCHANGE_INFO: Endpoint = Endpoint::new(
    "exchange_info",
    Method::Get,
    "/api/v3/exchangeInfo",
    Security::None,
    &[],
);

pub const DEPTH: Endpoint =
    Endpoint::new("depth", Method::Get, "/api/v3/depth", Security::None, &["symbol"]);

pub const TRADES: Endpoint =
    Endpoint::new("trades", Method::Get, "/api/v3/trades", Security::None, &["symbol"]);

pub const KLINES: Endpoint = Endpoint::new(
    "klines",
    Method::Get,
    "/api/v3/klines",
    Security::None,
    &["symbol", "interval"],
);

pub const TICKER_PRICE: Endpoint = Endpoint::new(
    "ticker_price",
    Method::Get,
    "/api/v3/ticker/price",
    Security::None,
    &[],
);

/// Server time response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: i64,
}

impl BinanceClient {
    /// Test connectivity.
    pub async fn ping(&self) -> ApiResult<ApiResponse<Value>> {
        self.call(&PING, Params::new()).await
    }

    /// Current server time.
    ///
    /// Useful to measure clock drift before choosing a `recvWindow`.
    pub async fn time(&self) -> ApiResult<ApiResponse<ServerTime>> {
        self.call_as(&TIME, Params::new()).await
    }

    /// Exchange trading rules and symbol information.
    ///
    /// Options: `symbol`, `symbols` (list), `permissions`.
    pub async fn exchange_info(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&EXCHANGE_INFO, options).await
    }

    /// Order book. Options: `limit`.
    pub async fn depth(&self, symbol: &str, options: Params) -> ApiResult<ApiResponse<Value>> {
        let params = Params::new().with("symbol", symbol).merge(options);
        self.call(&DEPTH, params).await
    }

    /// Recent trades. Options: `limit`.
    pub async fn trades(&self, symbol: &str, options: Params) -> ApiResult<ApiResponse<Value>> {
        let params = Params::new().with("symbol", symbol).merge(options);
        self.call(&TRADES, params).await
    }

    /// Kline/candlestick bars. Options: `startTime`, `endTime`, `timeZone`, `limit`.
    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        options: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval)
            .merge(options);
        self.call(&KLINES, params).await
    }

    /// Latest price for one symbol or all symbols. Options: `symbol`, `symbols`.
    pub async fn ticker_price(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&TICKER_PRICE, options).await
    }
}
