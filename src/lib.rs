//! # Binance Connector
//!
//! A Rust client for the Binance REST API family (spot, margin, futures,
//! broker sub-accounts).
//!
//! ## Modules
//!
//! - [`api`]: the signed-request engine (parameter encoding, HMAC signing,
//!   request building, transport and response classification)
//! - [`endpoints`]: endpoint descriptors and typed methods on [`api::BinanceClient`]
//! - [`credentials`]: API key and secret
//! - [`network`]: base URL constants
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binance_connector::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BinanceClient::builder()
//!         .api_key("key")
//!         .api_secret("secret")
//!         .base_url(SPOT_TESTNET_URL)
//!         .build()?;
//!
//!     let time = client.time().await?;
//!     println!("Server time: {}", time.data.server_time);
//!
//!     let resp = client
//!         .new_order_sor("BNBUSDT", "BUY", "LIMIT", 1.01, Params::new().with("recvWindow", 5000))
//!         .await?;
//!     println!("{}", resp.data);
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Signed-request engine: encoding, signing, dispatch, interpretation.
pub mod api;

/// API credentials.
pub mod credentials;

/// Endpoint descriptors and typed endpoint methods.
pub mod endpoints;

/// Network URL constants.
pub mod network;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use binance_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ApiError, ApiResponse, ApiResult, BinanceClient, BinanceClientBuilder, ClientConfig,
        ErrorKind, Method, ParamValue, Params, RequestSpec, RetryConfig, RetryPolicy, Security,
        Transport, TransportError,
    };
    pub use crate::credentials::Credentials;
    pub use crate::endpoints::market::ServerTime;
    pub use crate::endpoints::Endpoint;
    pub use crate::network::{
        COINM_FUTURES_URL, DEFAULT_API_URL, SPOT_TESTNET_URL, USDM_FUTURES_URL,
    };
}
