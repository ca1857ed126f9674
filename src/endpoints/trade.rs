//! Spot trading and account endpoints (signed).

use serde_json::Value;

use crate::api::client::BinanceClient;
use crate::api::error::ApiResult;
use crate::api::params::{ParamValue, Params};
use crate::api::request::{Method, Security};
use crate::api::response::ApiResponse;
use crate::endpoints::Endpoint;

pub const NEW_ORDER_TEST: Endpoint = Endpoint::new(
    "new_order_test",
    Method::Post,
    "/api/v3/order/test",
    Security::Signed,
    &["symbol", "side", "type"],
);

pub const NEW_ORDER: Endpoint = Endpoint::new(
    "new_order",
    Method::Post,
    "/api/v3/order",
    Security::Signed,
    &["symbol", "side", "type"],
);

pub const CANCEL_ORDER: Endpoint = Endpoint::new(
    "cancel_order",
    Method::Delete,
    "/api/v3/order",
    Security::Signed,
    &["symbol"],
);

pub const GET_ORDER: Endpoint = Endpoint::new(
    "get_order",
    Method::Get,
    "/api/v3/order",
    Security::Signed,
    &["symbol"],
);

pub const OPEN_ORDERS: Endpoint = Endpoint::new(
    "open_orders",
    Method::Get,
    "/api/v3/openOrders",
    Security::Signed,
    &[],
);

pub const ACCOUNT: Endpoint =
    Endpoint::new("account", Method::Get, "/api/v3/account", Security::Signed, &[]);

pub const MY_TRADES: Endpoint = Endpoint::new(
    "my_trades",
    Method::Get,
    "/api/v3/myTrades",
    Security::Signed,
    &["symbol"],
);

/// Smart order routing.
pub const NEW_ORDER_SOR: Endpoint = Endpoint::new(
    "new_order_sor",
    Method::Post,
    "/api/v3/sor/order",
    Security::Signed,
    &["symbol", "side", "type", "quantity"],
);

pub const NEW_ORDER_SOR_TEST: Endpoint = Endpoint::new(
    "new_order_sor_test",
    Method::Post,
    "/api/v3/sor/order/test",
    Security::Signed,
    &["symbol", "side", "type", "quantity"],
);

fn order_params(symbol: &str, side: &str, order_type: &str) -> Params {
    Params::new()
        .with("symbol", symbol)
        .with("side", side)
        .with("type", order_type)
}

impl BinanceClient {
    /// Validate a new order without sending it to the matching engine.
    pub async fn new_order_test(
        &self,
        symbol: &str,
        side: &str,
        order_type: &str,
        options: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        let params = order_params(symbol, side, order_type).merge(options);
        self.call(&NEW_ORDER_TEST, params).await
    }

    /// Place a new order.
    ///
    /// Options: `timeInForce`, `quantity`, `quoteOrderQty`, `price`,
    /// `newClientOrderId`, `stopPrice`, `icebergQty`, `newOrderRespType`,
    /// `recvWindow`, ...
    pub async fn new_order(
        &self,
        symbol: &str,
        side: &str,
        order_type: &str,
        options: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        let params = order_params(symbol, side, order_type).merge(options);
        self.call(&NEW_ORDER, params).await
    }

    /// Cancel an active order. Options: `orderId`, `origClientOrderId`.
    pub async fn cancel_order(&self, symbol: &str, options: Params) -> ApiResult<ApiResponse<Value>> {
        let params = Params::new().with("symbol", symbol).merge(options);
        self.call(&CANCEL_ORDER, params).await
    }

    /// Query an order. Options: `orderId`, `origClientOrderId`.
    pub async fn get_order(&self, symbol: &str, options: Params) -> ApiResult<ApiResponse<Value>> {
        let params = Params::new().with("symbol", symbol).merge(options);
        self.call(&GET_ORDER, params).await
    }

    /// Current open orders. Options: `symbol`.
    pub async fn open_orders(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&OPEN_ORDERS, options).await
    }

    /// Account information.
    pub async fn account(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&ACCOUNT, options).await
    }

    /// Trades for a symbol. Options: `orderId`, `startTime`, `endTime`, `fromId`, `limit`.
    pub async fn my_trades(&self, symbol: &str, options: Params) -> ApiResult<ApiResponse<Value>> {
        let params = Params::new().with("symbol", symbol).merge(options);
        self.call(&MY_TRADES, params).await
    }

    /// Place an order using smart order routing.
    pub async fn new_order_sor(
        &self,
        symbol: &str,
        side: &str,
        order_type: &str,
        quantity: impl Into<ParamValue>,
        options: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        let params = order_params(symbol, side, order_type)
            .with("quantity", quantity)
            .merge(options);
        self.call(&NEW_ORDER_SOR, params).await
    }

    /// Test a smart order routing order. Options: `computeCommissionRates`.
    pub async fn new_order_sor_test(
        &self,
        symbol: &str,
        side: &str,
        order_type: &str,
        quantity: impl Into<ParamValue>,
        options: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        let params = order_params(symbol, side, order_type)
            .with("quantity", quantity)
            .merge(options);
        self.call(&NEW_ORDER_SOR_TEST, params).await
    }
}
