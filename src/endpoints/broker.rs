//! Broker sub-account endpoints (signed, master account only).
//!
//! All parameters are passed through as options; the exchange validates
//! them.

use serde_json::Value;

use crate::api::client::BinanceClient;
use crate::api::error::ApiResult;
use crate::api::params::Params;
use crate::api::request::{Method, Security};
use crate::api::response::ApiResponse;
use crate::endpoints::Endpoint;

pub const SUB_ACCOUNT_CREATE: Endpoint = Endpoint::new(
    "sub_account_create",
    Method::Post,
    "/sapi/v1/broker/subAccount",
    Security::Signed,
    &[],
);

pub const SUB_ACCOUNT_LIST: Endpoint = Endpoint::new(
    "sub_account_list",
    Method::Get,
    "/sapi/v1/broker/subAccount",
    Security::Signed,
    &[],
);

pub const SUB_ACCOUNT_API: Endpoint = Endpoint::new(
    "sub_account_api",
    Method::Post,
    "/sapi/v1/broker/subAccountApi",
    Security::Signed,
    &[],
);

pub const SUB_ACCOUNT_TRANSFER: Endpoint = Endpoint::new(
    "sub_account_transfer",
    Method::Post,
    "/sapi/v1/broker/transfer",
    Security::Signed,
    &[],
);

pub const BROKER_INFO: Endpoint = Endpoint::new(
    "broker_info",
    Method::Get,
    "/sapi/v1/broker/info",
    Security::Signed,
    &[],
);

pub const UNIVERSAL_TRANSFER_HISTORY: Endpoint = Endpoint::new(
    "universal_transfer_history",
    Method::Get,
    "/sapi/v1/broker/universalTransfer",
    Security::Signed,
    &[],
);

pub const ENABLE_UNIVERSAL_TRANSFER_PERMISSION: Endpoint = Endpoint::new(
    "enable_universal_transfer_permission",
    Method::Post,
    "/sapi/v1/broker/subAccountApi/permission/universalTransfer",
    Security::Signed,
    &[],
);

pub const UPDATE_IP_RESTRICTION: Endpoint = Endpoint::new(
    "update_ip_restriction",
    Method::Post,
    "/sapi/v2/broker/subAccountApi/ipRestriction",
    Security::Signed,
    &[],
);

impl BinanceClient {
    /// Create a broker sub-account. Options: `tag`.
    pub async fn sub_account_create(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&SUB_ACCOUNT_CREATE, options).await
    }

    /// Query sub-accounts. Options: `subAccountId`, `page`, `size`.
    pub async fn sub_account_list(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&SUB_ACCOUNT_LIST, options).await
    }

    /// Create an API key for a sub-account.
    pub async fn sub_account_api(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&SUB_ACCOUNT_API, options).await
    }

    /// Transfer between master and sub-accounts.
    pub async fn sub_account_transfer(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&SUB_ACCOUNT_TRANSFER, options).await
    }

    /// Broker account information.
    pub async fn broker_info(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&BROKER_INFO, options).await
    }

    /// Universal transfer history.
    pub async fn universal_transfer_history(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&UNIVERSAL_TRANSFER_HISTORY, options).await
    }

    /// Enable universal transfer for a sub-account API key.
    pub async fn enable_universal_transfer_permission(
        &self,
        options: Params,
    ) -> ApiResult<ApiResponse<Value>> {
        self.call(&ENABLE_UNIVERSAL_TRANSFER_PERMISSION, options)
            .await
    }

    /// Update the IP restriction of a sub-account API key.
    pub async fn update_ip_restriction(&self, options: Params) -> ApiResult<ApiResponse<Value>> {
        self.call(&UPDATE_IP_RESTRICTION, options).await
    }
}
