//! REST API engine for Binance.
//!
//! Every call flows through the same pipeline:
//!
//! 1. [`params`]: ordered parameters and their canonical query encoding
//! 2. [`signer`]: HMAC-SHA256 over the canonical query
//! 3. [`request`]: timestamp, signature, API-key header, URL/body placement
//! 4. [`transport`]: network I/O behind the [`Transport`] trait
//! 5. [`response`]: decode the body, classify failures into [`ApiError`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use binance_connector::api::{BinanceClient, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BinanceClient::new("api_key", "api_secret")?;
//!
//!     let order = client
//!         .new_order(
//!             "BNBUSDT",
//!             "BUY",
//!             "LIMIT",
//!             Params::new()
//!                 .with("timeInForce", "GTC")
//!                 .with("quantity", 1.01)
//!                 .with("price", 300.5)
//!                 .with("recvWindow", 5000),
//!         )
//!         .await?;
//!     println!("{}", order.data);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>` which is an alias for `Result<T, ApiError>`.
//! Use [`ApiError::kind`] to branch on the failure class:
//!
//! ```rust,ignore
//! use binance_connector::api::ErrorKind;
//!
//! match client.account(Params::new()).await {
//!     Ok(resp) => println!("{}", resp.data),
//!     Err(e) if e.kind() == ErrorKind::Exchange => println!("code {:?}", e.exchange_code()),
//!     Err(e) if e.kind() == ErrorKind::Timeout => println!("timed out, state unknown"),
//!     Err(e) => println!("other error: {}", e),
//! }
//! ```

pub mod client;
pub mod error;
pub mod params;
pub mod request;
pub mod response;
pub mod retry;
pub mod signer;
pub mod transport;

// Re-export main types for convenience
pub use client::{BinanceClient, BinanceClientBuilder, ClientConfig};
pub use error::{ApiError, ApiResult, ErrorKind, ErrorResponse, TransportError};
pub use params::{encode, ParamValue, Params};
pub use request::{build, Method, PreparedRequest, RequestSpec, Security};
pub use response::{interpret, ApiResponse, RawResponse};
pub use retry::{RetryConfig, RetryPolicy};
pub use signer::sign;
pub use transport::Transport;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
